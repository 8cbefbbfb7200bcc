use crate::pipe::{Pipe, PipeResult, Validate, ValidationErrors};
use async_trait::async_trait;
use std::marker::PhantomData;

/// A pipe that runs the payload's own constraints
pub struct ValidationPipe<T> {
    _payload: PhantomData<fn() -> T>,
}

impl<T> Default for ValidationPipe<T> {
    fn default() -> Self {
        Self {
            _payload: PhantomData,
        }
    }
}

#[async_trait]
impl<T> Pipe for ValidationPipe<T>
where
    T: Validate + Send + 'static,
{
    type Input = T;
    type Output = T;

    async fn transform(&self, input: T) -> PipeResult<T> {
        input.validate()?;
        Ok(input)
    }
}

/// A pipe that parses a comma separated list of numeric ids, e.g. `1,2,3`
pub struct ParseIdsPipe {
    object_name: String,
    field: String,
}

impl ParseIdsPipe {
    pub fn new(object_name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            field: field.into(),
        }
    }
}

#[async_trait]
impl Pipe for ParseIdsPipe {
    type Input = String;
    type Output = Vec<i64>;

    async fn transform(&self, input: String) -> PipeResult<Vec<i64>> {
        let mut errors = ValidationErrors::new(self.object_name.clone());
        let mut ids = Vec::new();

        for raw in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match raw.parse::<i64>() {
                Ok(id) => ids.push(id),
                Err(_) => {
                    errors.reject(&self.field, "TypeMismatch", [raw], "{1} is not a valid id");
                }
            }
        }
        errors.not_empty(&self.field, &ids);

        errors.into_result()?;
        Ok(ids)
    }
}
