//! File-based rendering of built trees

use flattree::{TreeBuilder, TreeOptions};
use flattree_templating::{TemplatingError, TreeTemplateEngine};
use rstest::rstest;
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use tempfile::TempDir;

const MENU: &str = "{% for item in items %}[{{ item.label }}\
{% for child in item.sub %}({{ child.label }}){% endfor %}]{% endfor %}";

fn menu_builder() -> TreeBuilder {
    let mut builder = TreeBuilder::new();
    builder
        .configure(TreeOptions::new().sort_by("label"))
        .add_values([
            json!({"id": 1, "pid": 0, "label": "Shop"}),
            json!({"id": 2, "pid": 1, "label": "Shoes"}),
            json!({"id": 3, "pid": 1, "label": "Hats"}),
            json!({"id": 4, "pid": 0, "label": "About"}),
        ])
        .unwrap();
    builder
}

fn write_template(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_render_builds_tree_when_none_given() {
    let dir = TempDir::new().unwrap();
    let template = write_template(&dir, "menu.liquid", MENU);

    let output = TreeTemplateEngine::new()
        .render(&menu_builder(), &template, None, &Map::new())
        .unwrap();
    assert_eq!(output, "[About][Shop(Hats)(Shoes)]");
}

#[test]
fn test_render_uses_supplied_tree() {
    let dir = TempDir::new().unwrap();
    let template = write_template(&dir, "menu.liquid", MENU);

    let builder = menu_builder();
    let mut tree = builder.build().unwrap();
    tree.truncate(1);

    let output = TreeTemplateEngine::new()
        .render(&builder, &template, Some(&tree), &Map::new())
        .unwrap();
    assert_eq!(output, "[About]");
}

#[test]
fn test_render_empty_tree_is_empty_string() {
    let dir = TempDir::new().unwrap();
    let template = write_template(&dir, "menu.liquid", "never {{ evaluated }}");

    let output = TreeTemplateEngine::new()
        .render(&TreeBuilder::new(), &template, None, &Map::new())
        .unwrap();
    assert_eq!(output, "");
}

#[rstest]
#[case::missing_file("nope.liquid")]
#[case::directory("")]
fn test_render_template_not_found(#[case] name: &str) {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join(name);

    let err = TreeTemplateEngine::new()
        .render(&menu_builder(), &template, None, &Map::new())
        .unwrap_err();
    match err {
        TemplatingError::TemplateNotFound { path } => assert_eq!(path, template),
        other => panic!("expected TemplateNotFound, got {other:?}"),
    }
}

#[test]
fn test_render_params_next_to_items() {
    let dir = TempDir::new().unwrap();
    let template = write_template(
        &dir,
        "menu.liquid",
        "<nav class=\"{{ class }}\">{{ items.size }}</nav>",
    );

    let mut params = Map::new();
    params.insert("class".into(), Value::from("main"));

    let output = TreeTemplateEngine::new()
        .render(&menu_builder(), &template, None, &params)
        .unwrap();
    assert_eq!(output, "<nav class=\"main\">2</nav>");
}

#[test]
fn test_render_includes_partial_from_template_directory() {
    let dir = TempDir::new().unwrap();
    write_template(&dir, "entry.liquid", "<li>{{ item.path | join: \"/\" }}</li>");
    let template = write_template(
        &dir,
        "menu.liquid",
        "<ul>{% for parent in items %}{% for item in parent.sub %}{% include 'entry' %}{% endfor %}{% endfor %}</ul>",
    );

    let output = TreeTemplateEngine::new()
        .render(&menu_builder(), &template, None, &Map::new())
        .unwrap();
    assert_eq!(output, "<ul><li>Shop/Hats</li><li>Shop/Shoes</li></ul>");
}

#[test]
fn test_render_self_including_partial_reaches_every_level() {
    let dir = TempDir::new().unwrap();
    write_template(
        &dir,
        "node.liquid",
        "<li data-depth=\"{{ item.path.size }}\">{{ item.label }}\
{% if item.sub.size > 0 %}<ul>{% for item in item.sub %}{% include 'node' %}{% endfor %}</ul>{% endif %}</li>",
    );
    let template = write_template(
        &dir,
        "menu.liquid",
        "<ul>{% for item in items %}{% include 'node' %}{% endfor %}</ul>",
    );

    let mut builder = menu_builder();
    builder
        .add_values([
            json!({"id": 5, "pid": 2, "label": "Boots"}),
            json!({"id": 6, "pid": 5, "label": "Winter"}),
        ])
        .unwrap();

    let output = TreeTemplateEngine::new()
        .render(&builder, &template, None, &Map::new())
        .unwrap();
    assert_eq!(
        output,
        "<ul>\
<li data-depth=\"1\">About</li>\
<li data-depth=\"1\">Shop<ul>\
<li data-depth=\"2\">Hats</li>\
<li data-depth=\"2\">Shoes<ul>\
<li data-depth=\"3\">Boots<ul>\
<li data-depth=\"4\">Winter</li>\
</ul></li>\
</ul></li>\
</ul></li>\
</ul>"
    );
}

#[test]
fn test_render_propagates_build_errors() {
    let dir = TempDir::new().unwrap();
    let template = write_template(&dir, "menu.liquid", MENU);

    let mut builder = TreeBuilder::new();
    builder.add_value(json!({"id": 1, "pid": 0})).unwrap();

    let err = TreeTemplateEngine::new()
        .render(&builder, &template, None, &Map::new())
        .unwrap_err();
    assert!(matches!(err, TemplatingError::Tree(_)));
}

#[test]
fn test_untrusted_engine_rejects_deep_nesting() {
    let dir = TempDir::new().unwrap();
    let deep = format!("{}x{}", "{% if true %}".repeat(12), "{% endif %}".repeat(12));
    let template = write_template(&dir, "deep.liquid", &deep);

    let err = TreeTemplateEngine::untrusted()
        .render(&menu_builder(), &template, None, &Map::new())
        .unwrap_err();
    assert!(matches!(err, TemplatingError::Security(_)));

    let output = TreeTemplateEngine::new()
        .render(&menu_builder(), &template, None, &Map::new())
        .unwrap();
    assert_eq!(output, "x");
}
