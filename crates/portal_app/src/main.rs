//! Terminal client for the placement portal.
mod app;
mod config;
mod confirm;
mod effects;
mod input;
mod render;

fn main() -> anyhow::Result<()> {
    app::run()
}
