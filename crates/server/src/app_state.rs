use crate::api::FixtureSource;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) project: String,
    pub(crate) fixture: FixtureSource,
}
