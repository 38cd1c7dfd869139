use std::path::PathBuf;

pub struct ReadArgs {
    pub config: PathBuf,
    pub dry_run: bool,
}

pub struct ProbeArgs {
    pub config: PathBuf,
    pub sensor: String,
}
