use colored::*;

pub struct FeedbackAnalyzer;

impl FeedbackAnalyzer {
    pub fn analyze(output: &str) -> Option<String> {
        // 1. A tool harbour drives is not installed
        if let Some(tool) = missing_tool(output) {
            return Some(format!(
                "'{}' was not found on your PATH.\nInstall it and make sure it is callable from this shell.",
                tool.bold().yellow()
            ));
        }

        // 2. Graphics dependency not fetched (CMake configure error)
        if output.contains("add_subdirectory given source")
            || output.contains("does not contain a CMakeLists.txt")
        {
            return Some(format!(
                "CMake could not find a dependency under {}.\nDelete the incomplete folder and run {} again to re-fetch it.",
                "external/".bold().yellow(),
                "harbour build".bold().green()
            ));
        }

        // 3. Unsupported language standard
        if output.contains("CXX_STANDARD is set to invalid value") {
            return Some(format!(
                "The C++ standard is not supported by your CMake/compiler.\nCheck {} in {}.",
                "cpp_version".bold().yellow(),
                ".harbourConfig".bold().yellow()
            ));
        }

        // 4. Main function missing (Specific Linker Error)
        if output.contains("undefined reference to `main'") {
            return Some(format!(
                "Your project is missing a {} function.\nEnsure {} defines the entry point.",
                "main()".bold().yellow(),
                "src/main.cpp".bold().green()
            ));
        }

        // 5. Generic Missing Library (Linker Error)
        if output.contains("undefined reference to") || output.contains("ld returned 1 exit status")
        {
            return Some(format!(
                "It looks like a {} error.\nYou might be missing a library in {}.\nAdd it with {}.",
                "Linker".bold().red(),
                "CMakeLists.txt".bold().yellow(),
                "target_link_libraries(...)".bold().green()
            ));
        }

        // 6. Missing Header (Compiler Error)
        if output.contains("fatal error: ") && output.contains("No such file or directory") {
            return Some(format!(
                "It looks like a {} error.\nPut project headers in {} or check the {} directories.",
                "Missing Header".bold().red(),
                "include/".bold().yellow(),
                "external/".bold().yellow()
            ));
        }

        None
    }
}

// Spawn failures read "failed to start '<tool>': ...".
fn missing_tool(output: &str) -> Option<&str> {
    let rest = output.split("failed to start '").nth(1)?;
    let (tool, _) = rest.split_once('\'')?;
    Some(tool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tool() {
        let err = "failed to start 'cmake': No such file or directory (os error 2)";
        let msg = FeedbackAnalyzer::analyze(err).unwrap();
        assert!(msg.contains("cmake"));
        assert!(msg.contains("PATH"));
    }

    #[test]
    fn test_missing_dependency_dir() {
        let err = "CMake Error at CMakeLists.txt:20 (add_subdirectory):\n  add_subdirectory given source \"external/glfw\" which is not an existing directory.";
        let msg = FeedbackAnalyzer::analyze(err).unwrap();
        assert!(msg.contains("external/"));
    }

    #[test]
    fn test_invalid_standard() {
        let err = "CMake Error in CMakeLists.txt:\n  CXX_STANDARD is set to invalid value '99'";
        let msg = FeedbackAnalyzer::analyze(err).unwrap();
        assert!(msg.contains("cpp_version"));
    }

    #[test]
    fn test_linker_error() {
        let err = "main.cpp:(.text+0x5): undefined reference to `glfwInit'";
        let msg = FeedbackAnalyzer::analyze(err).unwrap();
        assert!(msg.contains("Linker"));
        assert!(msg.contains("missing a library"));
        assert!(msg.contains("CMakeLists.txt"));
    }

    #[test]
    fn test_include_error() {
        let err = "src/main.cpp:1:10: fatal error: foo.h: No such file or directory";
        let msg = FeedbackAnalyzer::analyze(err).unwrap();
        assert!(msg.contains("Missing Header"));
    }

    #[test]
    fn test_main_error() {
        let err = "undefined reference to `main'";
        let msg = FeedbackAnalyzer::analyze(err).unwrap();
        assert!(msg.contains("missing a"));
        assert!(msg.contains("main()"));
    }

    #[test]
    fn test_unknown_output() {
        assert!(FeedbackAnalyzer::analyze("make: *** [all] Error 2").is_none());
    }
}
