use std::fs::Metadata;

/// Ownership and permission constraints a snippet file must satisfy.
///
/// Each field is optional; an unset field is not checked. The mode check
/// compares `actual & mask == expected & mask`, so callers can pin just the
/// bits they care about (a mask of `0o022` with expected `0` rejects group-
/// or world-writable files, for example).
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessCheck {
	/// Required owning user id.
	pub uid: Option<u32>,
	/// Required owning group id.
	pub gid: Option<u32>,
	/// Expected permission bits and the mask of bits to compare.
	pub mode: Option<ModeCheck>,
}

#[derive(Debug, Clone, Copy)]
pub struct ModeCheck {
	pub expected: u32,
	pub mask: u32,
}

impl AccessCheck {
	/// True when nothing is constrained.
	pub fn is_empty(&self) -> bool {
		self.uid.is_none() && self.gid.is_none() && self.mode.is_none()
	}

	/// Check `meta` against the constraints, reporting the first failure as
	/// a human-readable reason for the diagnostics list.
	#[cfg(unix)]
	pub fn check(&self, meta: &Metadata) -> Result<(), String> {
		use std::os::unix::fs::MetadataExt;

		if let Some(uid) = self.uid
			&& meta.uid() != uid
		{
			return Err(format!("owned by uid {} (want {uid})", meta.uid()));
		}
		if let Some(gid) = self.gid
			&& meta.gid() != gid
		{
			return Err(format!("owned by gid {} (want {gid})", meta.gid()));
		}
		if let Some(ModeCheck { expected, mask }) = self.mode {
			let actual = meta.mode() & 0o7777;
			if actual & mask != expected & mask {
				return Err(format!(
					"mode {actual:04o} does not match {expected:04o} under mask {mask:04o}"
				));
			}
		}
		Ok(())
	}

	/// Owner and mode bits are unavailable off unix; any constraint fails
	/// closed rather than silently passing.
	#[cfg(not(unix))]
	pub fn check(&self, _meta: &Metadata) -> Result<(), String> {
		if self.is_empty() {
			Ok(())
		} else {
			Err("ownership checks are not supported on this platform".to_string())
		}
	}
}

#[cfg(all(test, unix))]
mod tests {
	use super::*;
	use std::fs;
	use std::os::unix::fs::PermissionsExt;

	#[test]
	fn test_empty_check_passes() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("f.conf");
		fs::write(&path, "").unwrap();
		let meta = fs::metadata(&path).unwrap();
		assert!(AccessCheck::default().check(&meta).is_ok());
	}

	#[test]
	fn test_mode_mask_comparison() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("f.conf");
		fs::write(&path, "").unwrap();
		fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
		let meta = fs::metadata(&path).unwrap();

		let exact = AccessCheck {
			mode: Some(ModeCheck {
				expected: 0o640,
				mask: 0o7777,
			}),
			..Default::default()
		};
		assert!(exact.check(&meta).is_ok());

		// Only the world-writable bit is pinned; 0o640 has it clear
		let no_world_write = AccessCheck {
			mode: Some(ModeCheck {
				expected: 0,
				mask: 0o002,
			}),
			..Default::default()
		};
		assert!(no_world_write.check(&meta).is_ok());

		let must_be_world_readable = AccessCheck {
			mode: Some(ModeCheck {
				expected: 0o004,
				mask: 0o004,
			}),
			..Default::default()
		};
		assert!(must_be_world_readable.check(&meta).is_err());
	}

	#[test]
	fn test_uid_mismatch_reports_reason() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("f.conf");
		fs::write(&path, "").unwrap();
		let meta = fs::metadata(&path).unwrap();

		use std::os::unix::fs::MetadataExt;
		let other_uid = meta.uid().wrapping_add(1);
		let check = AccessCheck {
			uid: Some(other_uid),
			..Default::default()
		};
		let reason = check.check(&meta).unwrap_err();
		assert!(reason.contains("uid"));
	}
}
