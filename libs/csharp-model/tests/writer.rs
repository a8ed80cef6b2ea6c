use config::constants::{IndentStyle, RegionStyle, WriterConfig};
use csharp_model::*;

fn sample_tree() -> CodeTree {
    let mut tree = CodeTree::new();
    let ns = tree.create("Acme.Tools", ElementData::Namespace(NamespaceElement::default()));
    let mut class_data = TypeElement::new(TypeKind::Class);
    class_data.access = CodeAccess::Public;
    class_data.modifiers = Modifiers::SEALED;
    class_data.interfaces.push(InterfaceReference::new("IDisposable", InterfaceReferenceKind::None));
    let class = tree.create("Widget", ElementData::Type(class_data));
    let region = tree.create("Fields", ElementData::Region(RegionElement { is_directive: true }));
    let count = tree.create(
        "_count",
        ElementData::Field(FieldElement {
            access: CodeAccess::Private,
            field_type: "int".to_string(),
            initial_value: Some("0".to_string()),
            ..FieldElement::default()
        }),
    );
    let dispose = tree.create(
        "Dispose",
        ElementData::Method(MethodElement {
            access: CodeAccess::Public,
            return_type: Some("void".to_string()),
            body: MemberBody::Block("\n            _count = 0;\n        ".to_string()),
            ..MethodElement::default()
        }),
    );
    tree.add_root(ns);
    tree.add_child(ns, class).unwrap();
    tree.add_child(class, region).unwrap();
    tree.add_child(region, count).unwrap();
    tree.add_child(class, dispose).unwrap();
    tree
}

#[test]
fn writes_nested_declarations() {
    let text = write_tree(&sample_tree(), &WriterConfig::default());
    let expected = "namespace Acme.Tools\n{\n    public sealed class Widget : IDisposable\n    {\n        #region Fields\n\n        private int _count = 0;\n\n        #endregion\n\n        public void Dispose()\n        {\n            _count = 0;\n        }\n    }\n}\n";
    assert_eq!(text, expected);
}

#[test]
fn writes_comment_directive_regions_and_tabs() {
    let config = WriterConfig::default()
        .with_indent(IndentStyle::Tabs)
        .unwrap()
        .with_region_style(RegionStyle::CommentDirective);
    let text = write_tree(&sample_tree(), &config);
    assert!(text.contains("\t\t// $(Begin) Fields\n"));
    assert!(text.contains("\t\t// $(End) Fields\n"));
}

#[test]
fn writes_condition_chain() {
    let mut tree = CodeTree::new();
    let head = tree.create(
        "",
        ElementData::ConditionDirective(ConditionDirectiveElement {
            condition: Some("DEBUG".to_string()),
            else_condition: None,
        }),
    );
    let other = tree.create("", ElementData::ConditionDirective(ConditionDirectiveElement::default()));
    let using = tree.create(
        "System.Diagnostics",
        ElementData::Using(UsingElement { redefine: None, is_static: false, is_movable: true }),
    );
    tree.add_root(head);
    tree.set_else_condition(head, Some(other)).unwrap();
    tree.add_child(head, using).unwrap();

    let text = write_tree(&tree, &WriterConfig::default());
    assert_eq!(text, "#if DEBUG\nusing System.Diagnostics;\n#else\n#endif\n");
}

#[test]
fn writes_attributes_and_operators() {
    let mut tree = CodeTree::new();
    let method = tree.create(
        "+",
        ElementData::Method(MethodElement {
            access: CodeAccess::Public,
            modifiers: Modifiers::STATIC,
            return_type: Some("Money".to_string()),
            parameters: "Money a, Money b".to_string(),
            is_operator: true,
            body: MemberBody::Expression("a.Add(b)".to_string()),
            ..MethodElement::default()
        }),
    );
    let attr = tree.create(
        "Pure",
        ElementData::Attribute(AttributeElement { target: None, arguments: None }),
    );
    tree.add_attribute(method, attr).unwrap();
    tree.add_root(method);

    let text = write_tree(&tree, &WriterConfig::default());
    assert_eq!(text, "[Pure]\npublic static Money operator +(Money a, Money b) => a.Add(b);\n");
}

#[test]
fn writes_event_initializer_and_fixed_buffer() {
    let mut tree = CodeTree::new();
    let event = tree.create(
        "Changed",
        ElementData::Event(EventElement {
            access: CodeAccess::Public,
            event_type: "EventHandler".to_string(),
            initial_value: Some(" null ".to_string()),
            ..EventElement::default()
        }),
    );
    let buffer = tree.create(
        "buf",
        ElementData::Field(FieldElement {
            modifiers: Modifiers::UNSAFE,
            field_type: "byte".to_string(),
            is_fixed: true,
            fixed_size: Some("16".to_string()),
            ..FieldElement::default()
        }),
    );
    tree.add_root(event);
    tree.add_root(buffer);

    let text = write_tree(&tree, &WriterConfig::default());
    assert!(text.contains("public event EventHandler Changed = null;\n"));
    assert!(text.contains("unsafe fixed byte buf[16];\n"));
}

#[test]
fn verbatim_string_lines_keep_their_text() {
    let mut tree = CodeTree::new();
    let method = tree.create(
        "Sql",
        ElementData::Method(MethodElement {
            return_type: Some("string".to_string()),
            body: MemberBody::Block(
                "\n            var q = @\"select *\n      from t\n\";\n            return q;\n        ".to_string(),
            ),
            ..MethodElement::default()
        }),
    );
    let class = tree.create("Query", ElementData::Type(TypeElement::new(TypeKind::Class)));
    tree.add_child(class, method).unwrap();
    tree.add_root(class);

    let text = write_tree(&tree, &WriterConfig::default());
    assert!(text.contains("        var q = @\"select *\n      from t\n\";\n        return q;\n"));
}
