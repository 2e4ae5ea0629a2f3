use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Timeline resolution. Transitions move one step at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoomLevel {
	#[default]
	Month,
	Week,
	Day,
}

impl ZoomLevel {
	pub fn zoom_in(self) -> Self {
		match self {
			ZoomLevel::Month => ZoomLevel::Week,
			ZoomLevel::Week | ZoomLevel::Day => ZoomLevel::Day,
		}
	}

	pub fn zoom_out(self) -> Self {
		match self {
			ZoomLevel::Day => ZoomLevel::Week,
			ZoomLevel::Week | ZoomLevel::Month => ZoomLevel::Month,
		}
	}

	pub fn can_zoom_in(self) -> bool {
		self != ZoomLevel::Day
	}

	pub fn can_zoom_out(self) -> bool {
		self != ZoomLevel::Month
	}
}

impl Display for ZoomLevel {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			ZoomLevel::Month => write!(f, "month"),
			ZoomLevel::Week => write!(f, "week"),
			ZoomLevel::Day => write!(f, "day"),
		}
	}
}

impl FromStr for ZoomLevel {
	type Err = ParseError;

	fn from_str(input: &str) -> Result<Self, Self::Err> {
		match input.trim().to_ascii_lowercase().as_str() {
			"month" => Ok(ZoomLevel::Month),
			"week" => Ok(ZoomLevel::Week),
			"day" => Ok(ZoomLevel::Day),
			_ => Err(ParseError::ZoomLevel(input.to_string())),
		}
	}
}
