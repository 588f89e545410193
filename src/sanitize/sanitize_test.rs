//! Tests for creation timestamp removal.

#[cfg(test)]
mod tests {
    use crate::object::Unstructured;
    use crate::sanitize::remove_creation_timestamp;
    use crate::value::{self, Map, Value};
    use pretty_assertions::assert_eq;

    fn map(json: &str) -> Map {
        match value::from_json(json).unwrap() {
            Value::Map(m) => m,
            other => panic!("expected map, got {}", other.type_name()),
        }
    }

    fn deployment() -> Map {
        map(r#"{
            "apiVersion": "apps/v1",
            "kind": "Deployment",
            "metadata": {"name": "test", "namespace": "test", "creationTimestamp": null},
            "spec": {
                "replicas": 3,
                "selector": null,
                "strategy": {},
                "template": {
                    "metadata": {"labels": {"test": "test"}, "creationTimestamp": null},
                    "spec": {"containers": [{"name": "test", "image": "test", "resources": {}}]}
                }
            },
            "status": {}
        }"#)
    }

    const CONFIG_MAP: &str = r#"{"apiVersion":"v1","data":{"some":"data"},"kind":"ConfigMap","metadata":{"creationTimestamp":"2024-01-02T03:04:05Z","name":"cm-test","namespace":"default"}}"#;

    fn manifest_work(manifests: Vec<Value>) -> Map {
        let mut work = map(r#"{
            "apiVersion": "work.open-cluster-management.io/v1",
            "kind": "ManifestWork",
            "metadata": {"name": "test", "namespace": "test", "creationTimestamp": "2024-01-02T03:04:05Z"},
            "spec": {"workload": {}}
        }"#);
        work.set_nested_field(&["spec", "workload", "manifests"], Value::List(manifests))
            .unwrap();
        work
    }

    #[test]
    fn test_remove_from_deployment_and_pod_template() {
        let mut obj = deployment();
        assert!(remove_creation_timestamp(&mut obj));

        assert!(obj.nested_field(&["metadata", "creationTimestamp"]).is_none());
        assert!(obj
            .nested_field(&["spec", "template", "metadata", "creationTimestamp"])
            .is_none());
        assert_eq!(
            obj.nested_str(&["spec", "template", "metadata", "labels", "test"]),
            Some("test")
        );
        assert_eq!(obj.nested_field(&["spec", "replicas"]), Some(&Value::Int(3)));
    }

    #[test]
    fn test_remove_from_embedded_serialized_document() {
        let mut work = manifest_work(vec![Value::String(CONFIG_MAP.to_string())]);
        assert!(remove_creation_timestamp(&mut work));

        assert!(work.nested_field(&["metadata", "creationTimestamp"]).is_none());

        let manifests = work.nested_list(&["spec", "workload", "manifests"]).unwrap();
        assert_eq!(manifests.len(), 1);
        let raw = manifests[0].as_str().expect("manifest stays serialized");
        let child = Unstructured::from_json(raw).unwrap();
        assert!(child.creation_timestamp().is_none());
        assert_eq!(child.name(), "cm-test");
        assert_eq!(child.namespace(), "default");
        assert_eq!(
            child.object().nested_field(&["data"]),
            map(CONFIG_MAP).nested_field(&["data"])
        );
    }

    #[test]
    fn test_embedded_document_keeps_large_integers() {
        let raw_child = r#"{"kind":"ConfigMap","metadata":{"creationTimestamp":"2024-01-02T03:04:05Z","name":"big"},"spec":{"big":18446744073709551615}}"#;
        let mut work = manifest_work(vec![Value::String(raw_child.to_string())]);
        work.set_nested_field(&["spec", "id"], Value::Uint(12345678901234567890))
            .unwrap();

        assert!(remove_creation_timestamp(&mut work));

        assert_eq!(
            work.nested_field(&["spec", "id"]),
            Some(&Value::Uint(12345678901234567890))
        );
        let manifests = work.nested_list(&["spec", "workload", "manifests"]).unwrap();
        let raw = manifests[0].as_str().unwrap();
        assert!(raw.contains("18446744073709551615"), "{raw}");
        assert!(!raw.contains("creationTimestamp"));
        assert_eq!(
            map(raw).nested_field(&["spec", "big"]),
            Some(&Value::Uint(u64::MAX))
        );
    }

    #[test]
    fn test_remove_from_embedded_decoded_document() {
        let mut work = manifest_work(vec![Value::Map(map(CONFIG_MAP))]);
        remove_creation_timestamp(&mut work);

        let manifests = work.nested_list(&["spec", "workload", "manifests"]).unwrap();
        let child = manifests[0].as_map().unwrap();
        assert!(child.nested_field(&["metadata", "creationTimestamp"]).is_none());
        assert_eq!(child.nested_str(&["data", "some"]), Some("data"));
    }

    #[test]
    fn test_embedded_documents_nest_recursively() {
        let inner = manifest_work(vec![Value::String(CONFIG_MAP.to_string())]);
        let inner_raw = value::to_json(&Value::Map(inner)).unwrap();
        let mut outer = manifest_work(vec![Value::String(inner_raw)]);

        remove_creation_timestamp(&mut outer);

        let outer_items = outer.nested_list(&["spec", "workload", "manifests"]).unwrap();
        let inner = map(outer_items[0].as_str().unwrap());
        assert!(inner.nested_field(&["metadata", "creationTimestamp"]).is_none());

        let inner_items = inner.nested_list(&["spec", "workload", "manifests"]).unwrap();
        let child = map(inner_items[0].as_str().unwrap());
        assert!(child.nested_field(&["metadata", "creationTimestamp"]).is_none());
    }

    #[test]
    fn test_undecodable_embedded_document_is_left_alone() {
        let garbage = Value::String("{not json".to_string());
        let scalar = Value::String("\"just a string\"".to_string());
        let mut work = manifest_work(vec![garbage.clone(), scalar.clone(), Value::Int(7)]);

        remove_creation_timestamp(&mut work);

        let manifests = work.nested_list(&["spec", "workload", "manifests"]).unwrap();
        assert_eq!(manifests, &vec![garbage, scalar, Value::Int(7)]);
        assert!(work.nested_field(&["metadata", "creationTimestamp"]).is_none());
    }

    #[test]
    fn test_document_without_timestamp_is_unchanged() {
        let raw_child = r#"{ "kind": "ConfigMap", "metadata": { "name": "x" } }"#;
        let mut obj = manifest_work(vec![Value::String(raw_child.to_string())]);
        obj.remove_nested_field(&["metadata", "creationTimestamp"]);
        let before = obj.clone();

        assert!(!remove_creation_timestamp(&mut obj));
        assert_eq!(obj, before);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let mut once = manifest_work(vec![Value::String(CONFIG_MAP.to_string())]);
        remove_creation_timestamp(&mut once);
        let mut twice = once.clone();

        assert!(!remove_creation_timestamp(&mut twice));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_timestamp_outside_metadata_is_kept() {
        let mut obj = map(r#"{"metadata":{"name":"x"},"spec":{"creationTimestamp":"keep"}}"#);
        assert!(!remove_creation_timestamp(&mut obj));
        assert_eq!(obj.nested_str(&["spec", "creationTimestamp"]), Some("keep"));
    }

    #[test]
    fn test_document_without_metadata() {
        let mut obj = map(r#"{"data":{"a":"b"}}"#);
        let before = obj.clone();
        assert!(!remove_creation_timestamp(&mut obj));
        assert_eq!(obj, before);
    }
}
