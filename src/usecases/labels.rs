use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    dto::labels::{CreateLabelRequest, UpdateLabelRequest},
    error::AppError,
    models::labels::{DEFAULT_LABEL_COLOR, Label},
    repositories::labels::{self as label_repo, DUPLICATE_LABEL_MESSAGE},
    telemetry::BusinessEvent,
    usecases::validation,
};

pub struct LabelService;

impl LabelService {
    pub async fn list_labels(pool: &PgPool) -> Result<Vec<Label>, AppError> {
        label_repo::list_labels(pool).await
    }

    pub async fn get_label(pool: &PgPool, label_id: Uuid) -> Result<Label, AppError> {
        label_repo::find_label(pool, label_id)
            .await?
            .ok_or_else(label_not_found)
    }

    /// Names are compared after trimming and case-sensitively. The unique
    /// index backs the pre-check when two requests race.
    pub async fn create_label(pool: &PgPool, req: CreateLabelRequest) -> Result<Label, AppError> {
        let name = label_name(req.name.as_deref())?;
        let color = match req.color {
            Some(color) => validation::hex_color(&color)?,
            None => DEFAULT_LABEL_COLOR.to_string(),
        };
        if label_repo::find_label_by_name(pool, &name).await?.is_some() {
            return Err(duplicate_label());
        }

        let label = label_repo::create_label(pool, Uuid::now_v7(), name, color).await?;
        BusinessEvent::LabelCreated { label_id: label.id }.log();
        Ok(label)
    }

    pub async fn update_label(
        pool: &PgPool,
        label_id: Uuid,
        req: UpdateLabelRequest,
    ) -> Result<Label, AppError> {
        let existing = label_repo::find_label(pool, label_id)
            .await?
            .ok_or_else(label_not_found)?;

        let name = req
            .name
            .as_deref()
            .map(|name| label_name(Some(name)))
            .transpose()?;
        let color = req
            .color
            .as_deref()
            .map(validation::hex_color)
            .transpose()?;

        if let Some(name) = name.as_deref() {
            if name != existing.name && label_repo::find_label_by_name(pool, name).await?.is_some()
            {
                return Err(duplicate_label());
            }
        }

        label_repo::update_label(pool, label_id, name, color)
            .await?
            .ok_or_else(label_not_found)
    }

    /// Removes the label and its task links. Tasks are untouched.
    pub async fn delete_label(pool: &PgPool, label_id: Uuid) -> Result<(), AppError> {
        if !label_repo::delete_label(pool, label_id).await? {
            return Err(label_not_found());
        }
        BusinessEvent::LabelDeleted { label_id }.log();
        Ok(())
    }
}

fn label_not_found() -> AppError {
    AppError::NotFound("Label not found".to_string())
}

fn duplicate_label() -> AppError {
    AppError::ValidationError(DUPLICATE_LABEL_MESSAGE.to_string())
}

fn label_name(name: Option<&str>) -> Result<String, AppError> {
    validation::required_text(
        name,
        validation::LABEL_NAME_MAX,
        "Label name is required",
        "Label name must be less than 50 characters",
    )
}

#[cfg(test)]
mod tests {
    use super::label_name;

    #[test]
    fn trailing_space_collapses_onto_the_same_name() {
        assert_eq!(label_name(Some("Bug ")).unwrap(), label_name(Some("Bug")).unwrap());
        assert_ne!(label_name(Some("BUG")).unwrap(), label_name(Some("Bug")).unwrap());
    }

    #[test]
    fn name_limits() {
        assert!(label_name(Some("")).is_err());
        assert!(label_name(Some(&"x".repeat(50))).is_ok());
        assert!(label_name(Some(&"x".repeat(51))).is_err());
    }
}
