use serde::Serialize;

use crate::models::portfolio::Portfolio;

pub const MIN_SKILL_LEVEL: f64 = 1.0;
pub const MAX_SKILL_LEVEL: f64 = 5.0;

/// A single rule violation, addressed by a JSON-ish path into the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldIssue {
    pub path: String,
    pub reason: String,
}

/// Parses and validates a full portfolio document.
///
/// Decoding enforces presence and types of every required field and the closed
/// category set; `check_portfolio` then applies the value-level rules.
pub fn parse_portfolio(body: &[u8]) -> Result<Portfolio, Vec<FieldIssue>> {
    let portfolio: Portfolio = serde_json::from_slice(body).map_err(|e| {
        vec![FieldIssue {
            path: "$".to_string(),
            reason: e.to_string(),
        }]
    })?;

    let issues = check_portfolio(&portfolio);
    if issues.is_empty() {
        Ok(portfolio)
    } else {
        Err(issues)
    }
}

/// Value-level rules the type system cannot express.
pub fn check_portfolio(portfolio: &Portfolio) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    for (category, skill) in portfolio.skills.iter() {
        let in_range = skill
            .level
            .as_f64()
            .is_some_and(|level| (MIN_SKILL_LEVEL..=MAX_SKILL_LEVEL).contains(&level));
        if !in_range {
            issues.push(FieldIssue {
                path: format!("skills.{category}.{}", skill.name),
                reason: format!(
                    "level must be between {MIN_SKILL_LEVEL} and {MAX_SKILL_LEVEL}, got {}",
                    skill.level
                ),
            });
        }
    }

    if !is_plausible_email(&portfolio.contact.email) {
        issues.push(FieldIssue {
            path: "contact.email".to_string(),
            reason: "must be a valid email address".to_string(),
        });
    }

    issues
}

/// Syntactic check only: `local@domain.tld`, no whitespace, one `@`.
pub fn is_plausible_email(address: &str) -> bool {
    if address.is_empty() || address.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = address.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !host.starts_with('.'),
        None => false,
    }
}

/// Joins issues into the single message carried by a 400 response.
pub fn describe(issues: &[FieldIssue]) -> String {
    let details = issues
        .iter()
        .map(|i| format!("{}: {}", i.path, i.reason))
        .collect::<Vec<_>>()
        .join("; ");
    format!("Invalid portfolio data ({details})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::portfolio::{sample_portfolio, sample_portfolio_json};

    fn body(value: &serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(value).unwrap()
    }

    #[test]
    fn test_sample_document_passes() {
        assert!(check_portfolio(&sample_portfolio()).is_empty());
        assert!(parse_portfolio(&body(&sample_portfolio_json())).is_ok());
    }

    #[test]
    fn test_missing_contact_email_fails_decoding() {
        let mut value = sample_portfolio_json();
        value["contact"].as_object_mut().unwrap().remove("email");
        let issues = parse_portfolio(&body(&value)).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].reason.contains("email"));
    }

    #[test]
    fn test_missing_top_level_field_fails() {
        let mut value = sample_portfolio_json();
        value.as_object_mut().unwrap().remove("skills");
        assert!(parse_portfolio(&body(&value)).is_err());
    }

    #[test]
    fn test_skill_level_out_of_range() {
        let mut portfolio = sample_portfolio();
        portfolio.skills.backend[0].level = 6.into();
        portfolio.skills.tools[0].level = 0.into();
        let issues = check_portfolio(&portfolio);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].path, "skills.backend.Rust");
        assert_eq!(issues[1].path, "skills.tools.Docker");
    }

    #[test]
    fn test_fractional_skill_levels_are_accepted() {
        let mut value = sample_portfolio_json();
        value["skills"]["frontend"][0]["level"] = serde_json::json!(3.5);
        value["skills"]["backend"][0]["level"] = serde_json::json!(4.0);
        let portfolio = parse_portfolio(&body(&value)).unwrap();
        assert_eq!(portfolio.skills.frontend[0].level.as_f64(), Some(3.5));
        // Written back as given, not normalised to an integer.
        assert_eq!(
            serde_json::to_value(&portfolio).unwrap()["skills"]["backend"][0]["level"],
            serde_json::json!(4.0)
        );
    }

    #[test]
    fn test_fractional_skill_level_out_of_range() {
        let mut value = sample_portfolio_json();
        value["skills"]["tools"][0]["level"] = serde_json::json!(5.5);
        let issues = parse_portfolio(&body(&value)).unwrap_err();
        assert_eq!(issues[0].path, "skills.tools.Docker");
    }

    #[test]
    fn test_invalid_contact_email() {
        let mut portfolio = sample_portfolio();
        portfolio.contact.email = "not-an-email".to_string();
        let issues = check_portfolio(&portfolio);
        assert_eq!(issues[0].path, "contact.email");
    }

    #[test]
    fn test_email_plausibility() {
        assert!(is_plausible_email("jane@x.com"));
        assert!(is_plausible_email("first.last+tag@mail.example.org"));
        assert!(!is_plausible_email(""));
        assert!(!is_plausible_email("jane@"));
        assert!(!is_plausible_email("@x.com"));
        assert!(!is_plausible_email("jane@x"));
        assert!(!is_plausible_email("jane@x."));
        assert!(!is_plausible_email("ja ne@x.com"));
        assert!(!is_plausible_email("a@b@c.com"));
    }

    #[test]
    fn test_describe_lists_every_issue() {
        let issues = vec![
            FieldIssue {
                path: "contact.email".to_string(),
                reason: "bad".to_string(),
            },
            FieldIssue {
                path: "skills.tools.Docker".to_string(),
                reason: "worse".to_string(),
            },
        ];
        let message = describe(&issues);
        assert!(message.starts_with("Invalid portfolio data"));
        assert!(message.contains("contact.email: bad"));
        assert!(message.contains("skills.tools.Docker: worse"));
    }
}
