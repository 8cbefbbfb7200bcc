use crate::i18n::Locale;
use crate::pipe::FieldError;
use dashmap::DashMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

const BUNDLE_BASENAME: &str = "messages";
const BUNDLE_EXTENSION: &str = "properties";

#[derive(Debug, Error)]
pub enum MessageSourceError {
    #[error("Malformed message bundle entry at line {line}: {content}")]
    MalformedEntry { line: usize, content: String },

    #[error("Invalid locale in bundle file name {0}")]
    InvalidBundleName(PathBuf),

    #[error("Failed to read message bundle {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Locale-aware lookup of message templates
pub trait MessageSource: Send + Sync + 'static {
    /// Find the raw template for `code`, falling back from the given locale
    /// to its language and then to the source's default locale.
    fn find(&self, code: &str, locale: &Locale) -> Option<String>;

    /// Render the client-facing message for a field error.
    ///
    /// Codes are tried from most to least specific
    /// (`Code.object.field`, `Code.field`, `Code`), then the error's default
    /// message, then the bare code.
    fn resolve_field_error(&self, error: &FieldError, locale: &Locale) -> String {
        let args = error.message_arguments();

        error
            .message_codes()
            .iter()
            .find_map(|code| self.find(code, locale))
            .or_else(|| error.default_message.clone())
            .map(|template| format_message(&template, &args))
            .unwrap_or_else(|| error.code.clone())
    }
}

/// In-memory message bundles keyed by locale
///
/// # Example
/// ```
/// use survey_web::i18n::{Locale, MessageSource, StaticMessageSource};
///
/// let messages = StaticMessageSource::new(Locale::default());
/// messages.load_properties(&Locale::new("fr", None), "NotBlank={0} est obligatoire").unwrap();
///
/// let fr_ca = Locale::new("fr", Some("CA"));
/// assert_eq!(messages.find("NotBlank", &fr_ca).as_deref(), Some("{0} est obligatoire"));
/// ```
#[derive(Debug)]
pub struct StaticMessageSource {
    default_locale: Locale,
    bundles: DashMap<Locale, HashMap<String, String>>,
}

impl StaticMessageSource {
    pub fn new(default_locale: Locale) -> Self {
        Self {
            default_locale,
            bundles: DashMap::new(),
        }
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    pub fn add_message(&self, locale: &Locale, code: impl Into<String>, template: impl Into<String>) {
        self.bundles
            .entry(locale.clone())
            .or_default()
            .insert(code.into(), template.into());
    }

    /// Load `key=value` (or `key: value`) lines into the bundle for `locale`.
    ///
    /// Blank lines and lines starting with `#` or `!` are skipped. Returns the
    /// number of entries loaded.
    pub fn load_properties(&self, locale: &Locale, content: &str) -> Result<usize, MessageSourceError> {
        let mut entries = Vec::new();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let Some(split_at) = line.find(['=', ':']) else {
                return Err(MessageSourceError::MalformedEntry {
                    line: index + 1,
                    content: line.to_string(),
                });
            };

            let key = line[..split_at].trim();
            if key.is_empty() {
                return Err(MessageSourceError::MalformedEntry {
                    line: index + 1,
                    content: line.to_string(),
                });
            }
            entries.push((key.to_string(), line[split_at + 1..].trim().to_string()));
        }

        let loaded = entries.len();
        let mut bundle = self.bundles.entry(locale.clone()).or_default();
        bundle.extend(entries);
        tracing::debug!("Loaded {} message(s) for locale {}", loaded, locale);

        Ok(loaded)
    }

    /// Load every `messages*.properties` bundle in `dir`.
    ///
    /// `messages.properties` feeds the default locale and
    /// `messages_fr_FR.properties` feeds `fr-FR`. Other files are ignored.
    /// Returns the number of entries loaded across all bundles.
    pub fn load_dir(&self, dir: &Path) -> Result<usize, MessageSourceError> {
        let io_error = |path: &Path| {
            let path = path.to_path_buf();
            move |source| MessageSourceError::Io { path, source }
        };

        let mut loaded = 0;
        for entry in std::fs::read_dir(dir).map_err(io_error(dir))? {
            let path = entry.map_err(io_error(dir))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(BUNDLE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let locale = if stem == BUNDLE_BASENAME {
                self.default_locale.clone()
            } else if let Some(tag) = stem.strip_prefix("messages_") {
                Locale::parse(tag).map_err(|_| MessageSourceError::InvalidBundleName(path.clone()))?
            } else {
                continue;
            };

            let content = std::fs::read_to_string(&path).map_err(io_error(&path))?;
            loaded += self.load_properties(&locale, &content)?;
        }

        Ok(loaded)
    }

    fn lookup(&self, code: &str, locale: &Locale) -> Option<String> {
        self.bundles
            .get(locale)
            .and_then(|bundle| bundle.get(code).cloned())
    }
}

impl Default for StaticMessageSource {
    fn default() -> Self {
        Self::new(Locale::default())
    }
}

impl MessageSource for StaticMessageSource {
    fn find(&self, code: &str, locale: &Locale) -> Option<String> {
        locale
            .candidates()
            .into_iter()
            .chain(self.default_locale.candidates())
            .find_map(|candidate| self.lookup(code, &candidate))
    }
}

/// Substitute `{n}` placeholders with `args[n]`.
///
/// Placeholders without a matching argument are left as written.
pub fn format_message(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let substituted = after.find('}').and_then(|close| {
            let index: usize = after[..close].trim().parse().ok()?;
            args.get(index).map(|arg| (arg, close))
        });

        match substituted {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn french() -> Locale {
        Locale::new("fr", None)
    }

    #[test]
    fn test_format_message_substitutes_known_placeholders() {
        let args = vec!["label".to_string(), "3".to_string()];
        assert_eq!(
            format_message("{0} needs at least {1} chars, {2} stays", &args),
            "label needs at least 3 chars, {2} stays"
        );
        assert_eq!(format_message("braces { alone }", &args), "braces { alone }");
    }

    #[test]
    fn test_find_falls_back_to_default_locale() {
        let messages = StaticMessageSource::default();
        messages.add_message(&Locale::default(), "NotBlank", "must not be blank");
        messages.add_message(&french(), "Size", "taille invalide");

        assert_eq!(messages.find("Size", &Locale::new("fr", Some("FR"))).as_deref(), Some("taille invalide"));
        assert_eq!(messages.find("NotBlank", &french()).as_deref(), Some("must not be blank"));
        assert_eq!(messages.find("Missing", &french()), None);
    }

    #[test]
    fn test_load_properties_skips_comments() {
        let messages = StaticMessageSource::default();
        let loaded = messages
            .load_properties(
                &french(),
                "# validation\n\n! legacy\nNotBlank = {0} est obligatoire\nSize: taille entre {1} et {2}\n",
            )
            .unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(messages.find("Size", &french()).as_deref(), Some("taille entre {1} et {2}"));
    }

    #[test]
    fn test_load_properties_reports_malformed_line() {
        let messages = StaticMessageSource::default();
        let err = messages
            .load_properties(&french(), "NotBlank=ok\nbroken line\n")
            .unwrap_err();

        assert!(matches!(
            err,
            MessageSourceError::MalformedEntry { line: 2, ref content } if content == "broken line"
        ));
        assert_eq!(messages.find("NotBlank", &french()), None);
    }

    #[test]
    fn test_load_dir_maps_file_names_to_locales() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("messages.properties"), "NotBlank={0} is required").unwrap();
        std::fs::write(dir.path().join("messages_fr_FR.properties"), "NotBlank={0} est requis").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a bundle").unwrap();

        let messages = StaticMessageSource::default();
        assert_eq!(messages.load_dir(dir.path()).unwrap(), 2);
        assert_eq!(messages.find("NotBlank", &Locale::new("fr", Some("FR"))).as_deref(), Some("{0} est requis"));
        assert_eq!(messages.find("NotBlank", &french()).as_deref(), Some("{0} is required"));
    }

    #[test]
    fn test_load_dir_rejects_bad_locale_suffix() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("messages_42.properties"), "NotBlank=x").unwrap();

        let err = StaticMessageSource::default().load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, MessageSourceError::InvalidBundleName(_)));
    }

    #[test]
    fn test_resolve_field_error_prefers_specific_codes() {
        let messages = StaticMessageSource::default();
        let en = Locale::default();
        messages.add_message(&en, "NotBlank", "{0} must not be blank");
        messages.add_message(&en, "NotBlank.questionDto.label", "A question needs a label");

        let label = FieldError::new("questionDto", "label", "NotBlank");
        let text = FieldError::new("answerDto", "text", "NotBlank");

        assert_eq!(messages.resolve_field_error(&label, &en), "A question needs a label");
        assert_eq!(messages.resolve_field_error(&text, &en), "text must not be blank");
    }

    #[test]
    fn test_resolve_field_error_uses_default_message_then_code() {
        let messages = StaticMessageSource::default();
        let en = Locale::default();

        let with_default = FieldError::new("userDto", "age", "Min")
            .with_arguments(["18"])
            .with_default_message("{0} must be at least {1}");
        let bare = FieldError::new("userDto", "email", "Email");

        assert_eq!(messages.resolve_field_error(&with_default, &en), "age must be at least 18");
        assert_eq!(messages.resolve_field_error(&bare, &en), "Email");
    }
}
