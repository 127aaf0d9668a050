//! Greeting personalisation from a visitor-supplied name.

/// Strips angle brackets and surrounding whitespace. Blank names are dropped.
pub fn sanitize_name(raw: &str) -> Option<String> {
	let cleaned: String = raw.chars().filter(|c| !matches!(c, '<' | '>')).collect();
	let trimmed = cleaned.trim();
	(!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn greeting_text(phrase: &str, name: Option<&str>) -> String {
	match name {
		Some(name) => format!("{}, {}!", phrase, name),
		None => format!("{}!", phrase),
	}
}

pub fn document_title(phrase: &str, name: Option<&str>) -> String {
	match name {
		Some(name) => format!("{} {}!", phrase, name),
		None => format!("{}!", phrase),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_angle_brackets() {
		assert_eq!(
			sanitize_name("<script>Ada</script>").as_deref(),
			Some("scriptAda/script")
		);
		assert_eq!(sanitize_name("  Grace ").as_deref(), Some("Grace"));
	}

	#[test]
	fn blank_names_fall_back() {
		assert_eq!(sanitize_name(""), None);
		assert_eq!(sanitize_name("<> "), None);
		assert_eq!(greeting_text("Happy New Year", None), "Happy New Year!");
	}

	#[test]
	fn personalised_strings() {
		assert_eq!(
			greeting_text("Happy New Year", Some("Ada")),
			"Happy New Year, Ada!"
		);
		assert_eq!(
			document_title("Happy New Year", Some("Ada")),
			"Happy New Year Ada!"
		);
	}
}
