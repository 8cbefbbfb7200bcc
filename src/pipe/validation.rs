use std::fmt;

/// A validation failure scoped to one input field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the validated payload, e.g. `questionDto`
    pub object_name: String,
    pub field: String,
    /// Constraint code, e.g. `NotBlank`
    pub code: String,
    /// Constraint arguments, substituted as `{1}`..`{n}`
    pub arguments: Vec<String>,
    pub default_message: Option<String>,
}

impl FieldError {
    pub fn new(
        object_name: impl Into<String>,
        field: impl Into<String>,
        code: impl Into<String>,
    ) -> Self {
        Self {
            object_name: object_name.into(),
            field: field.into(),
            code: code.into(),
            arguments: Vec::new(),
            default_message: None,
        }
    }

    pub fn with_arguments<I, T>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        self.arguments = arguments.into_iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_default_message(mut self, message: impl Into<String>) -> Self {
        self.default_message = Some(message.into());
        self
    }

    /// Message codes from most to least specific.
    pub fn message_codes(&self) -> Vec<String> {
        vec![
            format!("{}.{}.{}", self.code, self.object_name, self.field),
            format!("{}.{}", self.code, self.field),
            self.code.clone(),
        ]
    }

    /// Template arguments: the field name first, then the constraint arguments.
    pub fn message_arguments(&self) -> Vec<String> {
        std::iter::once(self.field.clone())
            .chain(self.arguments.iter().cloned())
            .collect()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.object_name, self.field, self.code)
    }
}

/// The field errors collected while validating one payload
///
/// # Example
/// ```
/// use survey_web::pipe::ValidationErrors;
///
/// let mut errors = ValidationErrors::new("questionDto");
/// errors.not_blank("label", "  ").size("label", "  ", 3, 255);
/// assert_eq!(errors.len(), 2);
/// assert!(errors.into_result().is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    object_name: String,
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new(object_name: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            errors: Vec::new(),
        }
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    pub fn field_errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push(&mut self, error: FieldError) -> &mut Self {
        self.errors.push(error);
        self
    }

    /// Record a failed constraint on `field` for this payload.
    pub fn reject<I, T>(
        &mut self,
        field: &str,
        code: &str,
        arguments: I,
        default_message: &str,
    ) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        let error = FieldError::new(self.object_name.clone(), field, code)
            .with_arguments(arguments)
            .with_default_message(default_message);
        self.push(error)
    }

    pub fn not_blank(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.reject(field, "NotBlank", None::<String>, "must not be blank");
        }
        self
    }

    pub fn not_null<T>(&mut self, field: &str, value: &Option<T>) -> &mut Self {
        if value.is_none() {
            self.reject(field, "NotNull", None::<String>, "must not be null");
        }
        self
    }

    pub fn not_empty<T>(&mut self, field: &str, value: &[T]) -> &mut Self {
        if value.is_empty() {
            self.reject(field, "NotEmpty", None::<String>, "must not be empty");
        }
        self
    }

    /// Character count of `value` must lie within `min..=max`.
    pub fn size(&mut self, field: &str, value: &str, min: usize, max: usize) -> &mut Self {
        let len = value.chars().count();
        if len < min || len > max {
            self.reject(field, "Size", [min, max], "size must be between {1} and {2}");
        }
        self
    }

    pub fn min(&mut self, field: &str, value: i64, min: i64) -> &mut Self {
        if value < min {
            self.reject(field, "Min", [min], "must be greater than or equal to {1}");
        }
        self
    }

    pub fn max(&mut self, field: &str, value: i64, max: i64) -> &mut Self {
        if value > max {
            self.reject(field, "Max", [max], "must be less than or equal to {1}");
        }
        self
    }

    /// `Ok(())` when nothing was rejected.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

/// Implemented by request payloads that carry their own constraints
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}
