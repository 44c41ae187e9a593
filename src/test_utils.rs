use crate::git::RepoProbe;

/// Canned repository state.
#[derive(Debug, Clone, Default)]
pub struct StubProbe {
    pub commit: Option<&'static str>,
    pub branch: Option<&'static str>,
    pub dirty: bool,
    pub describe: Option<&'static str>,
}

impl StubProbe {
    pub fn clean_repo() -> Self {
        StubProbe {
            commit: Some("abc1234"),
            branch: Some("main"),
            dirty: false,
            describe: Some("v1.2.0"),
        }
    }
}

impl RepoProbe for StubProbe {
    async fn commit(&self) -> Option<String> {
        self.commit.map(str::to_string)
    }

    async fn branch(&self) -> Option<String> {
        self.branch.map(str::to_string)
    }

    async fn is_dirty(&self) -> bool {
        self.dirty
    }

    async fn describe(&self) -> Option<String> {
        self.describe.map(str::to_string)
    }
}
