use std::fmt;

/// Ordered inline style declarations for one element.
///
/// Setting a property that already exists replaces its value in place, so
/// applying the same rule twice leaves the declaration list unchanged.
///
/// # Example
///
/// ```
/// use markpad::html::InlineStyle;
///
/// let mut style = InlineStyle::default();
/// style.set("color", "#333");
/// style.set("padding", "0");
/// style.set("color", "#35B378");
/// assert_eq!(style.to_string(), "color: #35B378; padding: 0");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    /// Parse a `style` attribute value (`a: b; c: d`).
    ///
    /// Malformed declarations without a colon are dropped.
    pub fn parse(source: &str) -> Self {
        let mut style = Self::default();
        for declaration in source.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let property = property.trim();
            let value = value.trim();
            if property.is_empty() || value.is_empty() {
                continue;
            }
            style.set(property, value);
        }
        style
    }

    /// Set `property` to `value`, replacing any existing declaration.
    pub fn set(&mut self, property: &str, value: impl Into<String>) {
        let value = value.into();
        let property = property.to_ascii_lowercase();
        if let Some(slot) = self
            .declarations
            .iter_mut()
            .find(|(existing, _)| *existing == property)
        {
            slot.1 = value;
        } else {
            self.declarations.push((property, value));
        }
    }

    /// Remove a declaration. Returns `true` if it was present.
    pub fn remove(&mut self, property: &str) -> bool {
        let before = self.declarations.len();
        self.declarations
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(property));
        before != self.declarations.len()
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(property))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|(property, value)| (property.as_str(), value.as_str()))
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (property, value)) in self.declarations.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{property}: {value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_in_place() {
        let mut style = InlineStyle::default();
        style.set("margin", "0");
        style.set("color", "red");
        style.set("margin", "4px");
        assert_eq!(style.to_string(), "margin: 4px; color: red");
        assert_eq!(style.len(), 2);
    }

    #[test]
    fn test_remove_reports_presence() {
        let mut style = InlineStyle::parse("background-color: #fff; color: red");
        assert!(style.remove("background-color"));
        assert!(!style.remove("background"));
        assert_eq!(style.to_string(), "color: red");
    }

    #[test]
    fn test_parse_skips_malformed_declarations() {
        let style = InlineStyle::parse("color: red;; nonsense ; font-size:12px;");
        assert_eq!(style.get("color"), Some("red"));
        assert_eq!(style.get("font-size"), Some("12px"));
        assert_eq!(style.len(), 2);
    }

    #[test]
    fn test_property_names_are_case_insensitive() {
        let mut style = InlineStyle::default();
        style.set("Color", "red");
        assert_eq!(style.get("color"), Some("red"));
        style.set("COLOR", "blue");
        assert_eq!(style.len(), 1);
    }
}
