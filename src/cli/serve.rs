//! Serve command - web form over the loaded model

use std::sync::Arc;

use anyhow::Result;

use crate::inference::InferenceService;
use crate::web;

/// Run the web form until Ctrl-C
pub fn run(bind: &str, service: InferenceService) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(web::serve(bind, Arc::new(service)))
}
