//! Unit tests for KeyedTable.

use nutshell_image::{MethodDefId, TypeRefId};

use super::{KeyedTable, MethodDefTable, TypeRefTable};

#[test]
fn get_or_add_assigns_dense_ids_in_order() {
    let mut table: MethodDefTable = KeyedTable::new();

    let a = table.get_or_add("Demo.App::Main()").unwrap();
    let b = table.get_or_add("Demo.App::.ctor()").unwrap();

    assert_eq!(a, MethodDefId(0));
    assert_eq!(b, MethodDefId(1));
    assert_eq!(table.len(), 2);
}

#[test]
fn get_or_add_deduplicates() {
    let mut table: TypeRefTable = KeyedTable::new();

    let a = table.get_or_add("System.Object").unwrap();
    let b = table.get_or_add("System.Object").unwrap();

    assert_eq!(a, b);
    assert_eq!(table.len(), 1);
}

#[test]
fn lookup_does_not_allocate() {
    let mut table: TypeRefTable = KeyedTable::new();
    table.get_or_add("System.String").unwrap();

    assert_eq!(table.lookup("System.String"), Some(TypeRefId(0)));
    assert_eq!(table.lookup("System.Int32"), None);
    assert_eq!(table.len(), 1);
}

#[test]
fn iter_follows_insertion_order() {
    let mut table: MethodDefTable = KeyedTable::new();
    table.get_or_add("b").unwrap();
    table.get_or_add("a").unwrap();
    table.get_or_add("c").unwrap();

    let keys: Vec<&str> = table.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["b", "a", "c"]);
}
