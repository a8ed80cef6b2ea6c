use csharp_model::*;
use csharp_parser::parse;

fn only_root(tree: &CodeTree) -> ElementId {
    assert_eq!(tree.roots().len(), 1, "expected one root: {:?}", tree.shape());
    tree.roots()[0]
}

fn names(tree: &CodeTree, ids: &[ElementId]) -> Vec<String> {
    ids.iter().map(|id| tree.name(*id).to_string()).collect()
}

#[test]
fn multi_field_declaration_becomes_sibling_fields() {
    let tree = parse("public class Widget\n{\n    private int a, b, c;\n}\n").unwrap();
    let class = only_root(&tree);
    let fields = tree.children(class);
    assert_eq!(names(&tree, fields), vec!["a", "b", "c"]);
    for field in fields {
        let ElementData::Field(data) = tree.data(*field) else {
            panic!("expected field");
        };
        assert_eq!(data.access, CodeAccess::Private);
        assert_eq!(data.field_type, "int");
        assert_eq!(tree.parent(*field), Some(class));
    }
}

#[test]
fn initializers_split_at_top_level_commas() {
    let tree = parse("class A { int x = 1, y, z = Max(2, 3); }").unwrap();
    let class = only_root(&tree);
    let values: Vec<Option<String>> = tree
        .children(class)
        .iter()
        .map(|id| match tree.data(*id) {
            ElementData::Field(field) => field.initial_value.clone(),
            _ => panic!("expected field"),
        })
        .collect();
    assert_eq!(names(&tree, tree.children(class)), vec!["x", "y", "z"]);
    assert_eq!(
        values,
        vec![Some("1".to_string()), None, Some("Max(2, 3)".to_string())]
    );
}

#[test]
fn trailing_comment_stays_with_field() {
    let tree = parse("class A\n{\n    private int count; // items\n}\n").unwrap();
    let field = tree.children(only_root(&tree))[0];
    let ElementData::Field(data) = tree.data(field) else {
        panic!("expected field");
    };
    let comment = data.trailing_comment.as_ref().unwrap();
    assert_eq!(comment.kind, CommentKind::Line);
    assert_eq!(comment.text, " items");
}

#[test]
fn header_comments_attach_to_next_declaration() {
    let source = "/// <summary>Widget.</summary>\n/* shared */\npublic class Widget { }\n";
    let tree = parse(source).unwrap();
    let class = only_root(&tree);
    let comments = tree.header_comments(class);
    assert_eq!(comments.len(), 2);
    let kinds: Vec<CommentKind> = comments
        .iter()
        .map(|id| match tree.data(*id) {
            ElementData::Comment(comment) => comment.kind,
            _ => panic!("expected comment"),
        })
        .collect();
    assert_eq!(kinds, vec![CommentKind::XmlLine, CommentKind::Block]);
}

#[test]
fn trailing_comments_become_elements() {
    let tree = parse("class A { }\n// end of file\n").unwrap();
    assert_eq!(tree.roots().len(), 2);
    assert_eq!(tree.kind(tree.roots()[1]), ElementKind::Comment);
}

#[test]
fn same_line_comment_after_member_is_a_sibling() {
    let tree = parse("class A\n{\n    void F() { } // done\n    int x;\n}\n").unwrap();
    let members = tree.children(only_root(&tree)).to_vec();
    assert_eq!(members.len(), 3, "{:?}", tree.shape());
    assert_eq!(tree.kind(members[0]), ElementKind::Method);
    let ElementData::Comment(comment) = tree.data(members[1]) else {
        panic!("expected comment");
    };
    assert_eq!(comment.text, " done");
    assert_eq!(tree.name(members[2]), "x");
    assert!(tree.header_comments(members[2]).is_empty());
    assert!(tree.header_comments(members[0]).is_empty());
}

#[test]
fn comment_on_next_line_is_still_a_header() {
    let tree = parse("class A\n{\n    void F() { }\n    // counter\n    int x;\n}\n").unwrap();
    let members = tree.children(only_root(&tree)).to_vec();
    assert_eq!(names(&tree, &members), vec!["F", "x"]);
    assert_eq!(tree.header_comments(members[1]).len(), 1);
}

#[test]
fn field_like_event_keeps_initializer() {
    let tree = parse("class A\n{\n    public event EventHandler E = null, F;\n}\n").unwrap();
    let members = tree.children(only_root(&tree)).to_vec();
    assert_eq!(names(&tree, &members), vec!["E", "F"]);
    let ElementData::Event(first) = tree.data(members[0]) else {
        panic!("expected event");
    };
    assert_eq!(first.access, CodeAccess::Public);
    assert_eq!(first.event_type, "EventHandler");
    assert_eq!(first.initial_value.as_deref(), Some("null"));
    assert!(first.body.is_none());
    let ElementData::Event(second) = tree.data(members[1]) else {
        panic!("expected event");
    };
    assert_eq!(second.initial_value, None);
}

#[test]
fn interpolated_string_braces_stay_in_method_body() {
    let source = "class A\n{\n    void F() { var s = $\"{(b ? \"}\" : \"x\")}\"; }\n    int y;\n}\n";
    let tree = parse(source).unwrap();
    let members = tree.children(only_root(&tree)).to_vec();
    assert_eq!(names(&tree, &members), vec!["F", "y"]);
    let ElementData::Method(method) = tree.data(members[0]) else {
        panic!("expected method");
    };
    assert_eq!(
        method.body,
        MemberBody::Block(" var s = $\"{(b ? \"}\" : \"x\")}\"; ".to_string())
    );
}

#[test]
fn properties_indexers_and_events() {
    let source = "\
public class Widget
{
    public int Count { get; set; } = 5;
    public int Size => _size;
    public string this[int index] { get { return null; } }
    public event EventHandler Changed;
    public event EventHandler Closed { add { } remove { } }
}
";
    let tree = parse(source).unwrap();
    let members = tree.children(only_root(&tree)).to_vec();
    assert_eq!(
        names(&tree, &members),
        vec!["Count", "Size", "this[int index]", "Changed", "Closed"]
    );

    let ElementData::Property(count) = tree.data(members[0]) else {
        panic!("expected property");
    };
    assert_eq!(count.property_type, "int");
    assert_eq!(count.initial_value.as_deref(), Some("5"));
    assert_eq!(count.body, MemberBody::Block(" get; set; ".to_string()));

    let ElementData::Property(size) = tree.data(members[1]) else {
        panic!("expected property");
    };
    assert_eq!(size.body, MemberBody::Expression("_size".to_string()));

    assert_eq!(tree.kind(members[2]), ElementKind::Property);
    let ElementData::Event(changed) = tree.data(members[3]) else {
        panic!("expected event");
    };
    assert_eq!(changed.event_type, "EventHandler");
    assert!(changed.body.is_none());
    assert_eq!(tree.kind(members[4]), ElementKind::Event);
}

#[test]
fn methods_constructors_and_delegates() {
    let source = "\
public class Widget : Base, IDisposable
{
    public Widget(int size) : base(size) { }
    public static T Create<T>() where T : class, new() { return new T(); }
    void IDisposable.Dispose() { }
    public abstract void Run();
    public async Task<int> LoadAsync() => await Task.FromResult(1);
    public delegate void Handler(object sender);
}
";
    let tree = parse(source).unwrap();
    let class = only_root(&tree);
    let ElementData::Type(widget) = tree.data(class) else {
        panic!("expected type");
    };
    let bases: Vec<&str> = widget.interfaces.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(bases, vec!["Base", "IDisposable"]);

    let members = tree.children(class).to_vec();
    assert_eq!(
        names(&tree, &members),
        vec!["Widget", "Create", "Dispose", "Run", "LoadAsync", "Handler"]
    );

    let ElementData::Constructor(ctor) = tree.data(members[0]) else {
        panic!("expected constructor");
    };
    assert_eq!(ctor.parameters, "int size");
    assert_eq!(ctor.reference.as_deref(), Some("base(size)"));

    let ElementData::Method(create) = tree.data(members[1]) else {
        panic!("expected method");
    };
    assert_eq!(create.modifiers, Modifiers::STATIC);
    assert_eq!(create.return_type.as_deref(), Some("T"));
    assert_eq!(create.type_parameters[0].constraints(), ["class", "new()"]);

    let ElementData::Method(dispose) = tree.data(members[2]) else {
        panic!("expected method");
    };
    assert_eq!(dispose.implementations[0].name, "IDisposable");
    assert_eq!(dispose.implementations[0].kind, InterfaceReferenceKind::Interface);

    let ElementData::Method(run) = tree.data(members[3]) else {
        panic!("expected method");
    };
    assert!(run.body.is_none());
    assert!(run.modifiers.contains(Modifiers::ABSTRACT));

    let ElementData::Method(load) = tree.data(members[4]) else {
        panic!("expected method");
    };
    assert!(load.is_async);
    assert_eq!(load.return_type.as_deref(), Some("Task<int>"));
    assert_eq!(
        load.body,
        MemberBody::Expression("await Task.FromResult(1)".to_string())
    );

    assert_eq!(tree.kind(members[5]), ElementKind::Delegate);
}

#[test]
fn operator_declarations() {
    let source = "\
public struct Money
{
    public static Money operator +(Money a, Money b) { return a; }
    public static bool operator ==(Money a, Money b) => true;
    public static implicit operator decimal(Money m) { return 0; }
}
";
    let tree = parse(source).unwrap();
    let members = tree.children(only_root(&tree)).to_vec();
    let operators: Vec<(String, OperatorKind, Option<String>)> = members
        .iter()
        .map(|id| match tree.data(*id) {
            ElementData::Method(method) => {
                assert!(method.is_operator);
                (
                    tree.name(*id).to_string(),
                    method.operator_kind,
                    method.return_type.clone(),
                )
            }
            _ => panic!("expected method"),
        })
        .collect();
    assert_eq!(
        operators,
        vec![
            ("+".to_string(), OperatorKind::None, Some("Money".to_string())),
            ("==".to_string(), OperatorKind::None, Some("bool".to_string())),
            ("decimal".to_string(), OperatorKind::Implicit, None),
        ]
    );
}

#[test]
fn constraint_order_is_enforced() {
    let error = parse("class A { void M<T>() where T : new(), IComparable { } }").unwrap_err();
    assert!(matches!(error.kind, csharp_parser::ParseErrorKind::Model(_)));
}

#[test]
fn namespaces_and_usings() {
    let source = "\
using System;
using static System.Math;
using Json = System.Text.Json;

namespace Acme.Tools
{
    internal sealed class Helper { }
}
";
    let tree = parse(source).unwrap();
    let roots = tree.roots().to_vec();
    assert_eq!(
        names(&tree, &roots),
        vec!["System", "System.Math", "Json", "Acme.Tools"]
    );

    let ElementData::Using(math) = tree.data(roots[1]) else {
        panic!("expected using");
    };
    assert!(math.is_static);
    let ElementData::Using(alias) = tree.data(roots[2]) else {
        panic!("expected using");
    };
    assert_eq!(alias.redefine.as_deref(), Some("System.Text.Json"));
    assert!(alias.is_movable);

    let helper = tree.children(roots[3])[0];
    let ElementData::Type(data) = tree.data(helper) else {
        panic!("expected type");
    };
    assert_eq!(data.access, CodeAccess::Internal);
    assert!(data.modifiers.contains(Modifiers::SEALED));
}

#[test]
fn file_scoped_namespace_owns_rest_of_file() {
    let tree = parse("namespace Demo;\n\nusing System;\n\npublic interface IShape { double Area(); }\n").unwrap();
    let namespace = only_root(&tree);
    let ElementData::Namespace(data) = tree.data(namespace) else {
        panic!("expected namespace");
    };
    assert!(data.is_file_scoped);
    assert_eq!(names(&tree, tree.children(namespace)), vec!["System", "IShape"]);
}

#[test]
fn enum_body_is_kept_raw() {
    let tree = parse("public enum Color : byte { Red, Green = 2 }").unwrap();
    let ElementData::Type(color) = tree.data(only_root(&tree)) else {
        panic!("expected type");
    };
    assert_eq!(color.kind, TypeKind::Enum);
    assert_eq!(color.interfaces[0].name, "byte");
    assert_eq!(color.body_text.as_deref(), Some(" Red, Green = 2 "));
    assert!(tree.children(only_root(&tree)).is_empty());
}

#[test]
fn generic_types_keep_parameters_and_constraints() {
    let tree = parse("public class Cache<TKey, TValue> : IDictionary<TKey, TValue> where TKey : notnull { }").unwrap();
    let class = only_root(&tree);
    assert_eq!(tree.name(class), "Cache");
    let ElementData::Type(data) = tree.data(class) else {
        panic!("expected type");
    };
    let params: Vec<&str> = data.type_parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(params, vec!["TKey", "TValue"]);
    assert_eq!(data.type_parameters[0].constraints(), ["notnull"]);
    assert_eq!(data.interfaces[0].name, "IDictionary<TKey, TValue>");
}

#[test]
fn attributes_attach_and_chain() {
    let source = "[Serializable, Obsolete(\"Use Gadget\")]\npublic class Widget { }\n";
    let tree = parse(source).unwrap();
    let class = only_root(&tree);
    let attributes = tree.attributes(class);
    assert_eq!(attributes.len(), 1);
    let head = attributes[0];
    assert_eq!(tree.name(head), "Serializable");

    let chained = tree.children(head)[0];
    assert_eq!(tree.name(chained), "Obsolete");
    let ElementData::Attribute(obsolete) = tree.data(chained) else {
        panic!("expected attribute");
    };
    assert_eq!(obsolete.arguments.as_deref(), Some("\"Use Gadget\""));
}

#[test]
fn assembly_attribute_is_a_root_element() {
    let tree = parse("[assembly: AssemblyVersion(\"1.0\")]\nnamespace A { }\n").unwrap();
    let roots = tree.roots().to_vec();
    assert_eq!(roots.len(), 2);
    let ElementData::Attribute(version) = tree.data(roots[0]) else {
        panic!("expected attribute");
    };
    assert_eq!(version.target.as_deref(), Some("assembly"));
    assert_eq!(tree.name(roots[0]), "AssemblyVersion");
}

#[test]
fn array_and_nullable_field_types() {
    let tree = parse("class A { private int[] values; private string? name; }").unwrap();
    let types: Vec<String> = tree
        .children(only_root(&tree))
        .iter()
        .map(|id| tree.data(*id).declared_type().unwrap_or_default().to_string())
        .collect();
    assert_eq!(types, vec!["int[]", "string?"]);
}

#[test]
fn unbalanced_braces_are_reported() {
    let error = parse("public class Widget {").unwrap_err();
    assert_eq!(error.message(), "Unexpected end of file. Expected }");

    let error = parse("}").unwrap_err();
    assert_eq!(error.kind, csharp_parser::ParseErrorKind::UnexpectedCharacter('}'));
}

#[test]
fn cloned_elements_are_independent() {
    let mut tree = parse("class A { int x; }").unwrap();
    let class = only_root(&tree);
    let copy = tree.clone_element(class);
    let copied_field = tree.children(copy)[0];
    tree.set_name(copied_field, "y");

    assert_eq!(tree.name(tree.children(class)[0]), "x");
    assert_eq!(tree.parent(copied_field), Some(copy));
    assert_eq!(tree.parent(copy), None);
}

#[test]
fn tuple_types_finalizers_and_fixed_buffers() {
    let source = "\
unsafe struct Buffer
{
    private protected fixed byte data[16];
    public (int, string) Pair() => (1, \"a\");
    ~Buffer() { }
};
";
    let tree = parse(source).unwrap();
    let members = tree.children(only_root(&tree)).to_vec();
    assert_eq!(names(&tree, &members), vec!["data", "Pair", "~Buffer"]);

    let ElementData::Field(data) = tree.data(members[0]) else {
        panic!("expected field");
    };
    assert!(data.is_fixed);
    assert_eq!(data.fixed_size.as_deref(), Some("16"));
    assert_eq!(data.access, CodeAccess::PrivateProtected);
    assert_eq!(data.field_type, "byte");

    let ElementData::Method(pair) = tree.data(members[1]) else {
        panic!("expected method");
    };
    assert_eq!(pair.return_type.as_deref(), Some("(int, string)"));
    assert_eq!(pair.body, MemberBody::Expression("(1, \"a\")".to_string()));

    assert_eq!(tree.kind(members[2]), ElementKind::Constructor);
}
