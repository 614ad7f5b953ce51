//! Parent wiring, visibility gating, import cycles and realm lifecycle.

use std::sync::Arc;

use realmscope::diagnostics::{display_hierarchy, RealmSnapshot};
use realmscope::prelude::*;

fn memory_with_unit(id: &str, name: &str, data: Vec<u8>) -> Arc<MemoryLocation> {
    let mut location = MemoryLocation::new(id);
    location.insert_unit(name, data);
    Arc::new(location)
}

#[test]
fn unrestricted_parent_fallthrough() {
    let world = World::new();
    let parent = world.new_realm("parent", Arc::new(SelfFirst)).unwrap();
    let child = world.new_realm("child", Arc::new(SelfFirst)).unwrap();

    parent.append_location(memory_with_unit("p", "com.acme.Widget", vec![1]));
    world.set_parent("child", "parent").unwrap();

    let unit = child.resolve_unit("com.acme.Widget").unwrap();
    assert_eq!(unit.origin_realm(), "parent");
}

#[test]
fn parent_visibility_becomes_an_allow_list() {
    let world = World::new();
    let parent = world.new_realm("parent", Arc::new(SelfFirst)).unwrap();
    let child = world.new_realm("child", Arc::new(SelfFirst)).unwrap();

    parent.append_location(memory_with_unit("p", "com.acme.Widget", vec![1]));
    world.set_parent("child", "parent").unwrap();

    // Allow-listing an unrelated prefix hides everything else.
    child.add_parent_visibility("com.other").unwrap();
    assert!(matches!(
        child.resolve_unit("com.acme.Widget"),
        Err(Error::NotFound(_))
    ));

    // Allow-listing the prefix restores visibility.
    child.add_parent_visibility("com.acme").unwrap();
    let unit = child.resolve_unit("com.acme.Widget").unwrap();
    assert_eq!(unit.origin_realm(), "parent");
}

#[test]
fn import_cycles_terminate_as_not_found() {
    let world = World::new();
    let a = world.new_realm("a", Arc::new(SelfFirst)).unwrap();
    let b = world.new_realm("b", Arc::new(SelfFirst)).unwrap();

    a.add_import("x", b.handle()).unwrap();
    b.add_import("x", a.handle()).unwrap();

    assert!(matches!(a.resolve_unit("x"), Err(Error::NotFound(_))));
    assert!(matches!(b.resolve_unit("x"), Err(Error::NotFound(_))));
}

#[test]
fn cycle_does_not_block_a_definition_elsewhere_in_the_loop() {
    let world = World::new();
    let a = world.new_realm("a", Arc::new(SelfFirst)).unwrap();
    let b = world.new_realm("b", Arc::new(SelfFirst)).unwrap();

    a.add_import("com.acme", b.handle()).unwrap();
    b.add_import("com.acme", a.handle()).unwrap();
    b.append_location(memory_with_unit("b-units", "com.acme.Widget", vec![7]));

    let unit = a.resolve_unit("com.acme.Widget").unwrap();
    assert_eq!(unit.origin_realm(), "b");
}

#[test]
fn parent_inheritance_import_routes_to_parent() {
    let world = World::new();
    let parent = world.new_realm("parent", Arc::new(SelfFirst)).unwrap();
    let child = world.new_realm("child", Arc::new(Isolated)).unwrap();

    parent.append_location(memory_with_unit("p", "com.acme.Widget", vec![1]));
    world.set_parent("child", "parent").unwrap();

    // Isolated never consults the parent directly, but an explicit
    // parent-inheritance import entry routes the prefix there.
    assert!(matches!(
        child.resolve_unit("org.other.Thing"),
        Err(Error::NotFound(_))
    ));

    child.add_parent_import("com.acme").unwrap();
    let unit = child.resolve_unit("com.acme.Widget").unwrap();
    assert_eq!(unit.origin_realm(), "parent");
}

#[test]
fn parent_first_strategy_prefers_inherited_definitions() {
    let world = World::new();
    let parent = world.new_realm("parent", Arc::new(SelfFirst)).unwrap();
    let child = world.new_realm("child", Arc::new(ParentFirst)).unwrap();

    parent.append_location(memory_with_unit("p", "com.acme.Widget", vec![1]));
    child.append_location(memory_with_unit("c", "com.acme.Widget", vec![2]));
    world.set_parent("child", "parent").unwrap();

    let unit = child.resolve_unit("com.acme.Widget").unwrap();
    assert_eq!(unit.origin_realm(), "parent");
}

#[test]
fn isolated_strategy_never_consults_the_parent() {
    let world = World::new();
    let parent = world.new_realm("parent", Arc::new(SelfFirst)).unwrap();
    let child = world.new_realm("child", Arc::new(Isolated)).unwrap();

    parent.append_location(memory_with_unit("p", "com.acme.Widget", vec![1]));
    world.set_parent("child", "parent").unwrap();

    assert!(matches!(
        child.resolve_unit("com.acme.Widget"),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn disposed_realm_fails_with_scope_closed() {
    let world = World::new();
    let app = world.new_realm("app", Arc::new(SelfFirst)).unwrap();
    app.append_location(memory_with_unit("a", "com.acme.Widget", vec![1]));
    app.resolve_unit("com.acme.Widget").unwrap();

    world.dispose_realm("app").unwrap();
    assert!(matches!(
        app.resolve_unit("com.acme.Widget"),
        Err(Error::ScopeClosed(_))
    ));
}

#[test]
fn imports_from_disposed_realms_are_silent_misses() {
    let world = World::new();
    let api = world.new_realm("api", Arc::new(SelfFirst)).unwrap();
    let app = world.new_realm("app", Arc::new(SelfFirst)).unwrap();

    api.append_location(memory_with_unit("api-units", "com.acme.api.Service", vec![1]));
    app.add_import("com.acme.api", api.handle()).unwrap();
    app.resolve_unit("com.acme.api.Service").unwrap();

    world.dispose_realm("api").unwrap();
    assert!(matches!(
        app.resolve_unit("com.acme.api.Service"),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn snapshot_reflects_realm_state() {
    let world = World::new();
    let api = world.new_realm("api", Arc::new(SelfFirst)).unwrap();
    let app = world.new_realm("app", Arc::new(SelfFirst)).unwrap();

    app.append_location(Arc::new(MemoryLocation::new("app-units")));
    app.add_import("com.acme.api", api.handle()).unwrap();
    app.add_parent_visibility("com.shared").unwrap();
    world.set_parent("app", "api").unwrap();

    let snapshot = RealmSnapshot::of(&app);
    assert_eq!(snapshot.id, "app");
    assert_eq!(snapshot.strategy, "self-first");
    assert_eq!(snapshot.parent.as_deref(), Some("api"));
    assert_eq!(snapshot.locations, ["app-units"]);
    assert_eq!(snapshot.foreign_imports, ["com.acme.api -> api"]);
    assert_eq!(snapshot.parent_visibility, ["com.shared"]);

    let rendered = display_hierarchy(&app);
    assert!(rendered.contains("realm =    app"));
    assert!(rendered.contains("realm =    api"));
    assert!(rendered.contains("strategy = self-first"));
}
