#[derive(Debug, Default)]
pub struct ServeArgs {
    /// Overrides the PORT environment variable
    pub port: Option<u16>,
    /// Keep writes in memory instead of calling the Google APIs
    pub dry_run: bool,
}
