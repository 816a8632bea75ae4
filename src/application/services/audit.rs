use crate::application::{
    ApplicationResult,
    dto::{AuditLogView, Page, PageRequest},
};
use crate::infrastructure::{database::DataContext, persistence::read_models};

pub struct AuditQueryService {
    context: DataContext,
}

impl AuditQueryService {
    pub fn new(context: DataContext) -> Self {
        Self { context }
    }

    pub async fn list(&self, request: PageRequest) -> ApplicationResult<Page<AuditLogView>> {
        let request = request.clamped();
        let (logs, total) = read_models::audit_log_page(&self.context, request).await?;
        let items = logs.into_iter().map(AuditLogView::from).collect();
        Ok(Page::new(items, request.page, request.page_size, total))
    }
}
