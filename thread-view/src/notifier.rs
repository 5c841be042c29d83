use serde::{Deserialize, Serialize};

/// Transient overlay naming the action under the pointer. Notifiers sit
/// outside the highlight precedence chain: showing one paints over the row,
/// hiding it leaves the row exactly as it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Notifier {
    User,
    Select,
    Report,
    Fold,
}

impl Notifier {
    pub fn label(&self) -> &'static str {
        match self {
            Notifier::User => "USER",
            Notifier::Select => "SELECT",
            Notifier::Report => "REPORT",
            Notifier::Fold => "FOLD",
        }
    }

    pub fn background(&self) -> &'static str {
        match self {
            Notifier::User => "#bedc90",
            Notifier::Select => "#dcba90",
            Notifier::Report => "#dc9190",
            Notifier::Fold => "#cbc0dc",
        }
    }

    pub fn text_color(&self) -> &'static str {
        "black"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Notifier::Report.label(), "REPORT");
        assert_eq!(Notifier::Fold.background(), "#cbc0dc");
        let parsed: Notifier = serde_json::from_str(r#""select""#).unwrap();
        assert_eq!(parsed, Notifier::Select);
    }
}
