use std::collections::HashSet;
use std::io::Write;

use prost::Message;

use graph_importer::proto::{attr_def, AttrDef, GraphDef, IntList, NodeDef, ShapeDef, TensorDef, TensorValueDef};
use graph_importer::{
    DataType, Error, GraphImporter, ImportOptions, ImportedGraph, OpRegistry, PropertyMappings,
    PropertyValue, TensorValue, VariableKind, WireGraph,
};

// -- helpers -----------------------------------------------------------------

fn tensor(name: &str, dtype: i32) -> TensorDef {
    TensorDef {
        name: name.to_string(),
        dtype,
        shape: None,
        value: None,
        placeholder: false,
        constant: false,
        auxiliary: false,
    }
}

fn placeholder(name: &str, dtype: i32, shape: &[i64]) -> TensorDef {
    let mut t = tensor(name, dtype);
    t.placeholder = true;
    t.shape = Some(ShapeDef { dim: shape.to_vec() });
    t
}

fn f32_constant(name: &str, dims: &[i64], values: &[f32]) -> TensorDef {
    let mut data = Vec::with_capacity(values.len() * 4);
    for v in values {
        data.extend_from_slice(&v.to_le_bytes());
    }
    let mut t = tensor(name, 1);
    t.constant = true;
    t.shape = Some(ShapeDef { dim: dims.to_vec() });
    t.value = Some(TensorValueDef {
        dtype: 1,
        dim: dims.to_vec(),
        data,
    });
    t
}

fn node(name: &str, op: &str, inputs: &[&str]) -> NodeDef {
    NodeDef {
        name: name.to_string(),
        op: op.to_string(),
        input: inputs.iter().map(|s| s.to_string()).collect(),
        control_input: Vec::new(),
        output: Vec::new(),
        attr: Vec::new(),
    }
}

fn graph(tensors: Vec<TensorDef>, nodes: Vec<NodeDef>) -> GraphDef {
    GraphDef {
        name: "test_graph".to_string(),
        tensor: tensors,
        node: nodes,
    }
}

fn import(def: GraphDef) -> graph_importer::Result<ImportedGraph> {
    GraphImporter::new().import(&WireGraph::new(def))
}

// -- the placeholder + constant + add scenario -------------------------------

#[test]
fn placeholder_add_constant_scenario() {
    let def = graph(
        vec![
            placeholder("x", 1, &[2, 2]),
            f32_constant("c", &[2, 2], &[1.0, 1.0, 1.0, 1.0]),
        ],
        vec![node("add", "Add", &["x", "c"])],
    );

    let imported = import(def).unwrap();

    // Two input-side variables plus one bound output
    assert_eq!(imported.variable_count(), 3);
    assert_eq!(imported.operation_count(), 1);

    let x = imported.variable("x").unwrap();
    assert_eq!(x.kind, VariableKind::Placeholder);
    assert_eq!(x.data_type, DataType::Float32);
    assert_eq!(x.shape.as_deref(), Some(&[2, 2][..]));
    assert!(x.value.is_none());
    assert!(x.output_of.is_none());

    let c = imported.variable("c").unwrap();
    assert_eq!(c.kind, VariableKind::Constant);
    let value = c.value.as_ref().unwrap();
    assert_eq!(value.dims, vec![2, 2]);
    assert_eq!(value.as_f32_vec().unwrap(), vec![1.0, 1.0, 1.0, 1.0]);
    assert_eq!(
        value.to_ndarray().unwrap(),
        ndarray::ArrayD::from_elem(ndarray::IxDyn(&[2, 2]), 1.0f32)
    );

    let add = imported.operation("add").unwrap();
    assert_eq!(add.outputs, vec!["add".to_string()]);
    let out = imported.variable("add").unwrap();
    assert_eq!(out.output_of.as_deref(), Some("add"));
    assert_eq!(out.data_type, DataType::Float32);
    assert_eq!(imported.op_for_output("add").unwrap().name, "add");
}

// -- failure surface ----------------------------------------------------------

#[test]
fn unknown_operation_aborts_import() {
    let def = graph(
        vec![placeholder("x", 1, &[1])],
        vec![node("mystery", "Woble", &["x"])],
    );

    match import(def) {
        Err(Error::UnknownOperation { node, op_type }) => {
            assert_eq!(node, "mystery");
            assert_eq!(op_type, "Woble");
        }
        other => panic!("expected UnknownOperation, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn undefined_data_type_aborts_import() {
    let def = graph(vec![tensor("bad", 0)], Vec::new());

    match import(def) {
        Err(Error::TypeResolution { tensor, .. }) => assert_eq!(tensor, "bad"),
        other => panic!("expected TypeResolution, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn constant_without_value_aborts_import() {
    let mut t = tensor("c", 1);
    t.constant = true;
    let def = graph(vec![t], Vec::new());

    match import(def) {
        Err(Error::MissingConstantValue { tensor }) => assert_eq!(tensor, "c"),
        other => panic!("expected MissingConstantValue, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn duplicate_output_claim_names_both_operations() {
    let mut first = node("a", "Add", &["x", "x"]);
    first.output = vec!["y".to_string()];
    let mut second = node("b", "Mul", &["x", "x"]);
    second.output = vec!["y".to_string()];

    let def = graph(vec![placeholder("x", 1, &[1])], vec![first, second]);

    match import(def) {
        Err(Error::DuplicateOutput {
            output,
            first,
            second,
        }) => {
            assert_eq!(output, "y");
            assert_eq!(first, "a");
            assert_eq!(second, "b");
        }
        other => panic!("expected DuplicateOutput, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn dangling_input_is_diagnosed_at_validation() {
    let def = graph(
        vec![placeholder("x", 1, &[1])],
        vec![node("add", "Add", &["x", "ghost"])],
    );

    match import(def) {
        Err(Error::DanglingInput { op, op_type, input }) => {
            assert_eq!(op, "add");
            assert_eq!(op_type, "Add");
            assert_eq!(input, "ghost");
        }
        other => panic!("expected DanglingInput, got {:?}", other.map(|_| ())),
    }
}

// -- output binding -----------------------------------------------------------

#[test]
fn zero_declared_outputs_get_at_least_one_synthesized() {
    let def = graph(
        vec![placeholder("x", 1, &[1])],
        vec![node("relu", "Relu", &["x"])],
    );

    let imported = import(def).unwrap();
    let op = imported.operation("relu").unwrap();
    assert!(!op.outputs.is_empty());
    assert_eq!(op.outputs[0], "relu");
    assert!(imported.variable("relu").is_some());
}

#[test]
fn multi_output_operations_synthesize_slot_names() {
    let def = graph(
        vec![placeholder("x", 1, &[4])],
        vec![node("topk", "TopK", &["x"])],
    );

    let imported = import(def).unwrap();
    let op = imported.operation("topk").unwrap();
    assert_eq!(op.outputs, vec!["topk".to_string(), "topk:1".to_string()]);
    assert_eq!(
        imported.variable("topk:1").unwrap().output_of.as_deref(),
        Some("topk")
    );
}

#[test]
fn producer_reference_wins_over_placeholder_guess() {
    // The foreign graph declares "p" as a placeholder but also declares an
    // operation named "p" producing it; the producer is recorded.
    let def = graph(
        vec![placeholder("x", 1, &[1]), placeholder("p", 1, &[1])],
        vec![node("p", "Relu", &["x"])],
    );

    let imported = import(def).unwrap();
    let p = imported.variable("p").unwrap();
    assert_eq!(p.kind, VariableKind::Placeholder);
    assert_eq!(p.output_of.as_deref(), Some("p"));
}

#[test]
fn plain_placeholder_never_gains_a_producer() {
    let def = graph(
        vec![placeholder("x", 1, &[1])],
        vec![node("relu", "Relu", &["x"])],
    );

    let imported = import(def).unwrap();
    assert!(imported.variable("x").unwrap().output_of.is_none());
}

#[test]
fn string_constants_become_scalar_zero() {
    let mut msg = tensor("msg", 12);
    msg.constant = true;
    msg.value = Some(TensorValueDef {
        dtype: 12,
        dim: Vec::new(),
        data: b"assertion text".to_vec(),
    });

    let imported = import(graph(vec![msg], Vec::new())).unwrap();
    let var = imported.variable("msg").unwrap();
    assert_eq!(var.data_type, DataType::String);
    assert_eq!(var.value, Some(TensorValue::scalar_f32(0.0)));
}

// -- materialization policy ---------------------------------------------------

#[test]
fn auxiliary_tensors_are_omitted_silently() {
    let mut aux = tensor("reduction_indices", 4);
    aux.auxiliary = true;

    let imported = import(graph(vec![placeholder("x", 1, &[1]), aux], Vec::new())).unwrap();
    assert!(imported.variable("reduction_indices").is_none());
    assert_eq!(imported.variable_count(), 1);
}

#[test]
fn cached_value_does_not_change_symbolic_kind() {
    let mut t = tensor("activations", 1);
    t.value = Some(TensorValueDef {
        dtype: 1,
        dim: vec![1],
        data: 2.0f32.to_le_bytes().to_vec(),
    });

    let imported = import(graph(vec![t], Vec::new())).unwrap();
    let var = imported.variable("activations").unwrap();
    assert_eq!(var.kind, VariableKind::Array);
    assert_eq!(var.value.as_ref().unwrap().as_f32_vec().unwrap(), vec![2.0]);
}

#[test]
fn control_dependencies_are_carried_verbatim() {
    let mut producer = node("t", "Relu", &["x"]);
    producer.control_input = vec!["barrier".to_string()];

    let def = graph(
        vec![placeholder("x", 1, &[1]), tensor("t", 1)],
        vec![producer],
    );

    let imported = import(def).unwrap();
    assert_eq!(
        imported.variable("t").unwrap().control_deps,
        vec!["barrier".to_string()]
    );
}

// -- ignore policy ------------------------------------------------------------

#[test]
fn ignored_op_types_are_not_translated() {
    let def = graph(
        vec![placeholder("x", 1, &[1])],
        vec![node("noop", "NoOp", &[]), node("relu", "Relu", &["x"])],
    );

    let imported = import(def).unwrap();
    assert!(imported.operation("noop").is_none());
    assert!(imported.operation("relu").is_some());
}

#[test]
fn ignore_set_applies_before_registry_lookup() {
    let mut options = ImportOptions::default();
    options.ops_to_ignore.insert("Unregistered".to_string());
    let importer = GraphImporter::with_collaborators(
        OpRegistry::with_standard_ops(),
        PropertyMappings::standard(),
        options,
    );

    let def = graph(
        vec![placeholder("x", 1, &[1])],
        vec![node("odd", "Unregistered", &["x"])],
    );

    // No UnknownOperation: the node is skipped, never looked up
    let imported = importer.import(&WireGraph::new(def)).unwrap();
    assert_eq!(imported.operation_count(), 0);
}

#[test]
fn exempt_nodes_are_translated_despite_ignore_set() {
    let mut options = ImportOptions::default();
    options.ignore_exempt_nodes = HashSet::from(["keep_me".to_string()]);
    let importer = GraphImporter::with_collaborators(
        OpRegistry::with_standard_ops(),
        PropertyMappings::standard(),
        options,
    );

    let def = graph(Vec::new(), vec![node("keep_me", "NoOp", &[])]);

    let imported = importer.import(&WireGraph::new(def)).unwrap();
    assert!(imported.operation("keep_me").is_some());
}

// -- property mapping ---------------------------------------------------------

#[test]
fn property_mapping_copies_and_converts_attributes() {
    let mut matmul = node("mm", "MatMul", &["x", "x"]);
    matmul.attr = vec![
        AttrDef {
            name: "transpose_a".to_string(),
            value: Some(attr_def::Value::I(1)),
        },
        // No rule registered for this attribute; silently not copied
        AttrDef {
            name: "unrelated".to_string(),
            value: Some(attr_def::Value::S("x".to_string())),
        },
    ];

    let mut conv = node("conv", "Conv2D", &["x", "x"]);
    conv.attr = vec![AttrDef {
        name: "strides".to_string(),
        value: Some(attr_def::Value::Ints(IntList { value: vec![1, 2, 2, 1] })),
    }];

    let def = graph(vec![placeholder("x", 1, &[2, 2])], vec![matmul, conv]);
    let imported = import(def).unwrap();

    let mm = imported.operation("mm").unwrap();
    assert_eq!(
        mm.properties.get("transpose_a"),
        Some(&PropertyValue::Bool(true))
    );
    assert!(mm.properties.get("unrelated").is_none());

    let conv = imported.operation("conv").unwrap();
    assert_eq!(
        conv.properties.get("strides"),
        Some(&PropertyValue::Ints(vec![1, 2, 2, 1]))
    );
}

#[test]
fn op_without_mapping_entry_has_no_properties() {
    let mut relu = node("relu", "Relu", &["x"]);
    relu.attr = vec![AttrDef {
        name: "whatever".to_string(),
        value: Some(attr_def::Value::F(0.5)),
    }];

    let imported = import(graph(vec![placeholder("x", 1, &[1])], vec![relu])).unwrap();
    assert!(imported.operation("relu").unwrap().properties.is_empty());
}

// -- determinism and traversal ------------------------------------------------

#[test]
fn repeated_imports_synthesize_identical_names() {
    let build = || {
        graph(
            vec![placeholder("x", 1, &[4])],
            vec![
                node("topk", "TopK", &["x"]),
                NodeDef {
                    name: String::new(), // forces a synthesized op name
                    op: "Relu".to_string(),
                    input: vec!["x".to_string()],
                    control_input: Vec::new(),
                    output: Vec::new(),
                    attr: Vec::new(),
                },
            ],
        )
    };

    let first = import(build()).unwrap();
    let second = import(build()).unwrap();

    let names = |g: &ImportedGraph| -> (Vec<String>, Vec<String>) {
        (
            g.variables().map(|v| v.name.clone()).collect(),
            g.operations().map(|o| o.name.clone()).collect(),
        )
    };
    assert_eq!(names(&first), names(&second));
    assert!(first.operation("relu_0").is_some());
}

#[test]
fn execution_order_visits_every_operation_once() {
    // Declared deliberately out of dependency order
    let def = graph(
        vec![placeholder("x", 1, &[1])],
        vec![
            node("c", "Relu", &["b"]),
            node("a", "Relu", &["x"]),
            node("b", "Relu", &["a"]),
        ],
    );

    let imported = import(def).unwrap();
    let order: Vec<&str> = imported
        .execution_order()
        .unwrap()
        .iter()
        .map(|o| o.name.as_str())
        .collect();

    assert_eq!(order.len(), 3);
    let pos = |n: &str| order.iter().position(|&o| o == n).unwrap();
    assert!(pos("a") < pos("b"));
    assert!(pos("b") < pos("c"));
}

// -- deserialization entry points ---------------------------------------------

#[test]
fn import_bytes_accepts_binary_encoding() {
    let def = graph(
        vec![placeholder("x", 1, &[1])],
        vec![node("relu", "Relu", &["x"])],
    );
    let bytes = def.encode_to_vec();

    let imported = GraphImporter::new().import_bytes(&bytes).unwrap();
    assert_eq!(imported.operation_count(), 1);
}

#[test]
fn import_bytes_falls_back_to_text_encoding() {
    let def = graph(
        vec![placeholder("x", 1, &[1])],
        vec![node("relu", "Relu", &["x"])],
    );
    let bytes = serde_json::to_vec(&def).unwrap();

    let imported = GraphImporter::new().import_bytes(&bytes).unwrap();
    assert_eq!(imported.operation_count(), 1);
    assert!(imported.variable("x").is_some());
}

#[test]
fn import_bytes_rejects_garbage() {
    let result = GraphImporter::new().import_bytes(b"\xff\xfe\xfdnot a graph");
    assert!(matches!(result, Err(Error::Deserialization(_))));
}

#[test]
fn import_path_reads_a_serialized_file() {
    let def = graph(
        vec![placeholder("x", 1, &[1])],
        vec![node("relu", "Relu", &["x"])],
    );

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&def.encode_to_vec()).unwrap();

    let imported = GraphImporter::new().import_path(file.path()).unwrap();
    assert_eq!(imported.operation_count(), 1);
}
