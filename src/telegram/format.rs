use crate::parser::Project;

/// Characters Telegram's MarkdownV2 mode reserves; every occurrence in
/// prose must be backslash-escaped or the API rejects the message.
const RESERVED: &str = "_*[]()~`>#+-=|{}.!";

/// Confirmation sent once after startup, independent of scrape outcome.
/// Pre-escaped: the trailing period carries its own backslash.
pub const STARTUP_CONFIRMATION: &str =
    "🤖 *تم تشغيل البوت بنجاح*\n\nأنا الآن أراقب موقع مستقل وسأقوم بإعلامك فور نزول أي مشاريع جديدة\\.";

/// Escape every reserved MarkdownV2 character with a preceding backslash.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if RESERVED.contains(ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Announcement for a project found during the steady-state loop.
pub fn new_project_message(project: &Project) -> String {
    render_project("📣 مشروع جديد على مستقل", project)
}

/// Announcement for the latest listed project, sent once on startup.
pub fn latest_project_message(project: &Project) -> String {
    render_project("🔥 أحدث مشروع حالي", project)
}

// Field text is escaped; the link slot is left raw on purpose. It sits
// inside the []() hyperlink syntax, where a backslash would break the URL.
fn render_project(header: &str, project: &Project) -> String {
    format!(
        "*{header}*\n\n\
         *{title}*\n\n\
         📝 *الوصف:*\n{description}\n\n\
         📊 *العروض:* {offers}\n\n\
         [🔗 عرض المشروع]({link})",
        header = header,
        title = escape_markdown(&project.title),
        description = escape_markdown(&project.description),
        offers = escape_markdown(&project.offers),
        link = project.link,
    )
}
