use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use survey_web::prelude::*;
use tokio::sync::RwLock;

#[derive(Clone, Debug, Serialize)]
pub struct Question {
    pub id: i64,
    pub label: String,
    pub choices: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct QuestionDto {
    pub label: String,
    #[serde(default)]
    pub choices: Vec<String>,
}

impl Validate for QuestionDto {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new("questionDto");
        errors
            .not_blank("label", &self.label)
            .size("label", &self.label, 3, 200)
            .not_empty("choices", &self.choices);
        for (index, choice) in self.choices.iter().enumerate() {
            errors.not_blank(&format!("choices[{}]", index), choice);
        }
        errors.into_result()
    }
}

#[derive(Debug, Deserialize)]
pub struct QuestionQuery {
    #[serde(default)]
    pub ids: String,
}

/// In-memory questions and users
pub struct SurveyStore {
    questions: RwLock<BTreeMap<i64, Question>>,
    users: RwLock<BTreeMap<i64, User>>,
    next_question_id: AtomicI64,
}

impl SurveyStore {
    pub fn seeded() -> Self {
        let questions = [
            (1, "How did you hear about us?", vec!["Friend", "Search", "Ad"]),
            (2, "Would you recommend us?", vec!["Yes", "No"]),
        ]
        .into_iter()
        .map(|(id, label, choices)| {
            let question = Question {
                id,
                label: label.to_string(),
                choices: choices.into_iter().map(String::from).collect(),
            };
            (id, question)
        })
        .collect();

        let users = [(1, "Joumen"), (2, "Ada")]
            .into_iter()
            .map(|(id, name)| (id, User { id, name: name.to_string() }))
            .collect();

        Self {
            questions: RwLock::new(questions),
            users: RwLock::new(users),
            next_question_id: AtomicI64::new(3),
        }
    }

    /// All requested questions, or every id that does not exist.
    pub async fn find_questions(&self, ids: &[i64]) -> survey_web::Result<Vec<Question>> {
        let questions = self.questions.read().await;
        let missing: Vec<_> = ids.iter().filter(|id| !questions.contains_key(*id)).collect();
        if !missing.is_empty() {
            return Err(SurveyError::question_not_found(missing));
        }
        Ok(ids.iter().filter_map(|id| questions.get(id).cloned()).collect())
    }

    pub async fn create_question(&self, dto: QuestionDto) -> Question {
        let id = self.next_question_id.fetch_add(1, Ordering::SeqCst);
        let question = Question {
            id,
            label: dto.label.trim().to_string(),
            choices: dto.choices,
        };
        self.questions.write().await.insert(id, question.clone());
        question
    }

    pub async fn find_user(&self, id: i64) -> survey_web::Result<User> {
        self.users
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| SurveyError::user_not_found([id]))
    }
}

pub async fn list_questions(
    State(store): State<Arc<SurveyStore>>,
    Query(query): Query<QuestionQuery>,
) -> survey_web::Result<Json<Vec<Question>>> {
    let ids = ParseIdsPipe::new("questionQuery", "ids").transform(query.ids).await?;
    Ok(Json(store.find_questions(&ids).await?))
}

pub async fn create_question(
    State(store): State<Arc<SurveyStore>>,
    ValidatedJson(dto): ValidatedJson<QuestionDto>,
) -> (StatusCode, Json<Question>) {
    let question = store.create_question(dto).await;
    tracing::info!("Created question {}", question.id);
    (StatusCode::CREATED, Json(question))
}

pub async fn get_user(
    State(store): State<Arc<SurveyStore>>,
    Path(id): Path<i64>,
) -> survey_web::Result<Json<User>> {
    Ok(Json(store.find_user(id).await?))
}

pub async fn boom() -> survey_web::Result<Json<User>> {
    Err(anyhow::anyhow!("storage backend unavailable")
        .context("loading survey results")
        .into())
}
