//! Entities and substances - Reference data listings

use std::path::Path;

use crate::auth::Page;
use crate::cli::display;
use crate::errors::Result;

use super::{open, require_page};

pub async fn entities(cwd: Option<&Path>, json: bool) -> Result<()> {
    let ctx = open(cwd).await?;
    require_page(&ctx.session, &[Page::Entities, Page::MyEntity])?;

    let entities = ctx.service.entities(&ctx.session).await;
    if json {
        return display::print_json(&entities);
    }
    display::print_entities(&entities);
    Ok(())
}

pub async fn substances(cwd: Option<&Path>, json: bool) -> Result<()> {
    let ctx = open(cwd).await?;
    let substances = ctx.service.substances().await;
    if json {
        return display::print_json(&substances);
    }
    display::print_substances(&substances);
    Ok(())
}
