//! Role tagger: proximity check between a VC name and role keywords
//!
//! A line that mentions the VC by name counts as an appointment signal if
//! that line, the line before or the line after contains a role keyword.
//! The check does not verify that the VC is the one making the
//! appointment, so an unrelated role mention next to an incidental VC
//! mention is reported as a hit.

use ipovc_domain::Role;

/// `"1"` if `vc_name` and one of `keywords` co-occur within a 3-line window
///
/// An empty `vc_name` always yields `"0"`.
pub fn tag_keywords(text: &str, vc_name: &str, keywords: &[&str]) -> &'static str {
    if has_appointment(text, vc_name, keywords) {
        "1"
    } else {
        "0"
    }
}

/// [`tag_keywords`] with the keyword set of `role`
pub fn tag_role(text: &str, vc_name: &str, role: Role) -> &'static str {
    tag_keywords(text, vc_name, role.keywords())
}

fn has_appointment(text: &str, vc_name: &str, keywords: &[&str]) -> bool {
    if vc_name.is_empty() {
        return false;
    }
    let lines: Vec<&str> = text.lines().collect();
    let mentions_role = |line: &str| keywords.iter().any(|k| line.contains(k));

    lines.iter().enumerate().any(|(i, line)| {
        if !line.contains(vc_name) {
            return false;
        }
        let start = i.saturating_sub(1);
        let end = (i + 1).min(lines.len() - 1);
        lines[start..=end].iter().any(|l| mentions_role(l))
    })
}
