#[derive(Clone, Debug, thiserror::Error)]
#[error("Invalid game mode {0:?} (expected 0, 1, 2 or 3)")]
pub struct InvalidGameModeError(pub String);

impl From<&str> for InvalidGameModeError {
	fn from(s: &str) -> Self {
		Self(s.to_owned())
	}
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("Invalid sample bank {0:?} (expected 0, 1, 2 or 3)")]
pub struct InvalidSampleBankError(pub String);

impl From<&str> for InvalidSampleBankError {
	fn from(s: &str) -> Self {
		Self(s.to_owned())
	}
}

#[derive(Clone, Debug, thiserror::Error)]
#[error("Invalid hit sample set {hss_string:?}: {context}")]
pub struct InvalidHitSampleSetError {
	pub hss_string: String,
	pub context: String,
}

impl From<&str> for InvalidHitSampleSetError {
	fn from(s: &str) -> Self {
		Self {
			hss_string: s.to_owned(),
			context: "expected `normal_set:addition_set`".to_owned(),
		}
	}
}
