// self
use crate::_prelude::*;

const DEBUG_TARGET: &str = "zoom_api::debug";

/// Emits the outgoing request URL, encoded query, and encoded body when `enabled`.
///
/// Diagnostics go to the `zoom_api::debug` tracing target. Without the `tracing` feature the
/// sink is absent and the call does nothing; it never fails. Authorization headers are not
/// part of the output.
pub fn debug_request(enabled: bool, url: &Url, query: &str, body: &[u8]) {
	if !enabled {
		return;
	}

	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			target: DEBUG_TARGET,
			url = %url,
			query,
			body = %String::from_utf8_lossy(body),
			"outgoing request"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (DEBUG_TARGET, url, query, body);
	}
}

/// Emits the raw response body when `enabled`.
pub fn debug_response(enabled: bool, status: u16, body: &[u8]) {
	if !enabled {
		return;
	}

	#[cfg(feature = "tracing")]
	{
		tracing::debug!(
			target: DEBUG_TARGET,
			status,
			body = %String::from_utf8_lossy(body),
			"response body"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (DEBUG_TARGET, status, body);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn debug_sink_never_fails() {
		let url = Url::parse("https://api.zoom.us/v2/users").expect("Fixture URL should parse.");

		debug_request(true, &url, "page_size=30", b"");
		debug_request(false, &url, "", b"{}");
		debug_response(true, 200, b"<html>not json</html>");
	}
}
