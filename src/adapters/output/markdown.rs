//! Markdown digest of an analysis result.

use crate::domain::AnalysisResult;

pub fn result_to_markdown(result: &AnalysisResult) -> String {
    let mut md = String::new();

    md.push_str("# Active discussions\n\n");
    md.push_str(&format!("**Timezone:** {}\n\n", result.timezone));

    if result.days.is_empty() {
        md.push_str("_No active discussions found._\n");
        return md;
    }

    for day in &result.days {
        md.push_str(&format!("## {}\n\n", day.date));
        for thread in &day.threads {
            md.push_str(&format!(
                "- **{}** ({} messages, {} users)\n",
                thread.topic, thread.messages, thread.users
            ));
        }
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DaySummary, DayThread};

    #[test]
    fn test_markdown_sections() {
        let result = AnalysisResult {
            timezone: "Asia/Tashkent".into(),
            days: vec![DaySummary {
                date: "2025-10-17".into(),
                threads: vec![DayThread {
                    topic: "Release plan".into(),
                    messages: 3,
                    users: 2,
                }],
            }],
        };
        let md = result_to_markdown(&result);
        assert!(md.starts_with("# Active discussions\n"));
        assert!(md.contains("## 2025-10-17\n"));
        assert!(md.contains("- **Release plan** (3 messages, 2 users)\n"));
    }

    #[test]
    fn test_markdown_empty() {
        let md = result_to_markdown(&AnalysisResult::empty("UTC"));
        assert!(md.contains("No active discussions found"));
    }
}
