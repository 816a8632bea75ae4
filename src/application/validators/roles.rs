use crate::application::{
    ApplicationResult, dto::RoleEditView, validation::ModelState,
};
use crate::domain::role::{ROLE_TITLE_MAX_LENGTH, Role};
use crate::infrastructure::persistence::{Filter, UnitOfWork};

pub const TITLE_TAKEN: &str = "Role with this title already exists.";

pub struct RoleValidator {
    unit_of_work: UnitOfWork,
}

impl RoleValidator {
    pub fn new(unit_of_work: UnitOfWork) -> Self {
        Self { unit_of_work }
    }

    pub async fn can_create(&self, view: &RoleEditView) -> ApplicationResult<ModelState> {
        self.validate(view, None).await
    }

    pub async fn can_edit(&self, view: &RoleEditView) -> ApplicationResult<ModelState> {
        self.validate(view, Some(view.id)).await
    }

    async fn validate(
        &self,
        view: &RoleEditView,
        existing_id: Option<i64>,
    ) -> ApplicationResult<ModelState> {
        let mut state = ModelState::new();
        let title = Some(view.title.as_str());
        if state.required("title", title)
            && state.max_length("title", title, ROLE_TITLE_MAX_LENGTH)
            && !self.is_unique_title(&view.title, existing_id).await?
        {
            state.add_error("title", TITLE_TAKEN);
        }
        Ok(state)
    }

    async fn is_unique_title(&self, title: &str, existing_id: Option<i64>) -> ApplicationResult<bool> {
        let matches = self
            .unit_of_work
            .select_where::<Role>(Filter::EqIgnoreCase("title", title.trim().to_owned()))
            .await?;
        Ok(matches.iter().all(|role| Some(role.id) == existing_id))
    }
}
