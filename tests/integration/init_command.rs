//! `init` writes an editable workspace that the loader and pipeline pick up.

use crate::integration::test_utils::with_isolated_env;
use journeygen::config::ConfigLoader;
use journeygen::init::{initialize_all, list_initialization};
use journeygen::prompt::{PromptTemplate, DEFAULT_PROMPTS};
use tempfile::TempDir;

#[test]
fn init_then_edit_prompt_changes_template() {
    let temp = TempDir::new().unwrap();
    with_isolated_env(&temp, || {
        let workspace = temp.path().join("ws");
        let summary = initialize_all(&workspace, false).unwrap();
        assert!(summary.prompts.errors.is_empty());
        assert!(summary.config.errors.is_empty());
        assert!(list_initialization(&workspace).prompts.is_empty());

        std::fs::write(
            workspace.join("prompts").join("base.md"),
            "Edited base prompt",
        )
        .unwrap();
        std::fs::write(
            workspace.join("prompts").join("opening.md"),
            "Edited opening\n",
        )
        .unwrap();

        let config = ConfigLoader::load(&workspace).unwrap();
        let template = PromptTemplate::from_config(&config.prompt, &workspace).unwrap();
        assert_eq!(template.base_prompt, "Edited base prompt");
        assert_eq!(template.opening_digest().as_str(), "Edited opening");
    });
}

#[test]
fn init_without_force_keeps_edits() {
    let temp = TempDir::new().unwrap();
    let workspace = temp.path();
    initialize_all(workspace, false).unwrap();
    std::fs::write(workspace.join("prompts").join("system.md"), "Mine").unwrap();

    let again = initialize_all(workspace, false).unwrap();
    assert_eq!(again.prompts.skipped.len(), DEFAULT_PROMPTS.len());
    assert_eq!(
        std::fs::read_to_string(workspace.join("prompts").join("system.md")).unwrap(),
        "Mine"
    );
}
