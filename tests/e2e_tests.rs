//! End-to-end integration tests
//!
//! These tests validate the complete replay pipeline using predefined
//! fixtures. Each test:
//! 1. Starts a bank in a fresh storage directory, seeded from seed.json
//! 2. Replays script.csv through the bank
//! 3. Generates the account summary CSV
//! 4. Compares actual output with expected.csv
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - Happy path scenarios
//! - Declined confirmation prompts
//! - Registration rules of the PIN-protected variant
//! - Rejected intents (logged out, bad credentials, insufficient funds, etc.)
//! - The open variant with legacy seed field names

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_bank_simulator::cli::Variant;
    use rust_bank_simulator::io::{decode_directory, DEFAULT_SLOT_KEY};
    use rust_bank_simulator::{RegistrationPolicy, ReplayConfig, SessionReplay};
    use std::fs;
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use tempfile::{NamedTempFile, TempDir};

    fn policy_for(variant: Variant) -> RegistrationPolicy {
        match variant {
            Variant::V1 => RegistrationPolicy::open(),
            Variant::V2 => RegistrationPolicy::pin_protected(),
        }
    }

    fn replay_for(fixture_dir: &str, storage: &TempDir, variant: Variant) -> SessionReplay {
        SessionReplay::new(ReplayConfig {
            storage_dir: storage.path().to_path_buf(),
            seed: Some(PathBuf::from(format!("{}/seed.json", fixture_dir))),
            policy: policy_for(variant),
        })
    }

    /// Run a test fixture by replaying script.csv and comparing with expected.csv
    ///
    /// # Panics
    ///
    /// Panics if:
    /// - Fixture files cannot be read
    /// - Output doesn't match expected
    /// - The persisted directory breaks the balance/ledger invariant
    fn run_test_fixture(fixture_name: &str, variant: Variant) {
        // Construct paths to fixture files
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let script_path = format!("{}/script.csv", fixture_dir);
        let expected_path = format!("{}/expected.csv", fixture_dir);

        for path in [&script_path, &expected_path] {
            assert!(Path::new(path).exists(), "Fixture file not found: {}", path);
        }

        let storage = TempDir::new().expect("Failed to create storage dir");
        let replay = replay_for(&fixture_dir, &storage, variant);

        // Create temporary output file
        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");

        replay
            .process(Path::new(&script_path), &mut temp_output)
            .unwrap_or_else(|e| panic!("Failed to replay script: {}", e));

        temp_output.flush().expect("Failed to flush temp file");

        let actual_output = fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e));

        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (variant: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, variant, actual_output, expected_output
        );

        // The storage slot holds the same accounts, each consistent with its ledger
        let stored = fs::read_to_string(storage.path().join(format!("{}.json", DEFAULT_SLOT_KEY)))
            .expect("Failed to read storage slot");
        let directory = decode_directory(&stored).expect("Failed to decode storage slot");
        assert_eq!(directory.len(), expected_output.lines().count() - 1);
        for account in directory.accounts() {
            assert!(
                account.is_consistent(),
                "Account {} is inconsistent",
                account.username
            );
        }
    }

    /// End-to-end test for all fixtures
    #[rstest]
    #[case("happy_path", Variant::V2)]
    #[case("declined_confirmation", Variant::V2)]
    #[case("registration_rules", Variant::V2)]
    #[case("rejected_intents", Variant::V2)]
    #[case("open_variant", Variant::V1)]
    fn test_fixtures(#[case] fixture: &str, #[case] variant: Variant) {
        run_test_fixture(fixture, variant);
    }

    /// A second replay starts from storage, not from the seed
    #[test]
    fn test_storage_survives_between_runs() {
        let fixture_dir = "tests/fixtures/happy_path";
        let storage = TempDir::new().expect("Failed to create storage dir");
        let replay = replay_for(fixture_dir, &storage, Variant::V2);
        let script = Path::new("tests/fixtures/happy_path/script.csv");

        replay
            .process(script, &mut Vec::new())
            .expect("First replay failed");

        // alice now holds 0, so the second transfer is rejected
        let mut output = Vec::new();
        let summary = replay
            .process(script, &mut output)
            .expect("Second replay failed");

        assert_eq!(summary.rejected, 1);
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "username,balance,entries\nalice,0,6\nbob,1800,2\n"
        );
    }

    #[test]
    fn test_corrupt_storage_is_reseeded() {
        let storage = TempDir::new().expect("Failed to create storage dir");
        fs::write(
            storage.path().join(format!("{}.json", DEFAULT_SLOT_KEY)),
            "{ not json",
        )
        .unwrap();
        let replay = replay_for("tests/fixtures/happy_path", &storage, Variant::V2);

        let mut output = Vec::new();
        replay
            .process(Path::new("tests/fixtures/happy_path/script.csv"), &mut output)
            .expect("Replay failed");

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "username,balance,entries\nalice,0,4\nbob,1800,2\n"
        );
    }
}
