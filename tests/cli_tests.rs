mod cli_tests_helper {

    use std::path::{Path, PathBuf};
    use std::process::{Command, Output};

    pub fn test_data(file_name: &str) -> PathBuf {
        let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        path.push("test_data");
        path.push(file_name);
        path
    }

    pub fn run_dfamin(input: &Path, extra_args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_dfamin"))
            .arg("--input")
            .arg(input)
            .args(extra_args)
            .output()
            .unwrap()
    }
}

mod cli_tests {
    use crate::cli_tests_helper::{run_dfamin, test_data};

    use dfamin::{load_dfa, Dfa, StateId};
    use std::fs;

    #[test]
    fn test_cli_reports_words_and_saves_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("minimal.json");
        let dot_path = dir.path().join("minimal.dot");

        let output = run_dfamin(
            &test_data("example.json"),
            &[
                "--word",
                "01",
                "--word",
                "000",
                "--output",
                json_path.to_str().unwrap(),
                "--dot",
                dot_path.to_str().unwrap(),
            ],
        );

        assert!(output.status.success());

        let stdout = String::from_utf8(output.stdout).unwrap();
        assert!(stdout.contains("Original DFA:"));
        assert!(stdout.contains("Minimal DFA:"));
        assert!(stdout.contains("States: 6 -> 2"));
        assert!(stdout.contains("Transitions: 12 -> 4"));
        assert!(stdout.contains("\"01\": original accepted, minimal accepted"));
        assert!(stdout.contains("\"000\": original rejected, minimal rejected"));

        assert!(stdout.contains("State mapping:"));
        for line in ["A -> q0", "B -> q0", "C -> q1", "D -> q1", "E -> q1", "F -> q1"] {
            assert!(stdout.contains(line), "missing {:?}", line);
        }

        let saved: Dfa<StateId, String> = load_dfa(&json_path).unwrap();
        assert_eq!(saved.num_states(), 2);
        assert_eq!(saved.num_transitions(), 4);
        assert_eq!(*saved.start(), StateId::new(0));

        let dot = fs::read_to_string(&dot_path).unwrap();
        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("→ q0"));
        assert!(dot.contains("(q1)"));
    }

    #[test]
    fn test_cli_fails_on_missing_input() {
        let output = run_dfamin(&test_data("missing.json"), &[]);

        assert!(!output.status.success());
        assert!(output.stdout.is_empty());
    }

    #[test]
    fn test_cli_fails_on_malformed_input() {
        let output = run_dfamin(&test_data("malformed.json"), &[]);

        assert!(!output.status.success());

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("is not a state of the DFA"));
    }
}
