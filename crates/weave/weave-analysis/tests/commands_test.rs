//! Command discovery and deferred command-interface binding.

mod common;

use common::{config, unary_error_method, Fixture, MODULE};

use weave_analysis::model::{LoadedPackage, MethodSig, TypeId};
use weave_analysis::{CommandDetector, Graph};

/// Declare the CLI library's command type and return `*cobra.Command`.
fn cobra_command_ptr(fx: &mut Fixture) -> TypeId {
    let cmd = fx.table.declare_struct("github.com/spf13/cobra", "Command");
    fx.table.pointer_to(cmd)
}

/// Declare a command struct with a `Command()` accessor and the given
/// handler methods, and register its constructor in a command package.
fn command_package(
    fx: &mut Fixture,
    rel_path: &str,
    pkg_name: &str,
    struct_name: &str,
    handlers: &[&str],
    ctor_params: &[TypeId],
) -> usize {
    let cobra_ptr = cobra_command_ptr(fx);
    let err = fx.error();

    let named = fx
        .table
        .declare_struct(&format!("{MODULE}/{rel_path}"), struct_name);
    fx.table.add_method(
        named,
        MethodSig::new("Command", vec![], vec![cobra_ptr]),
        true,
    );
    for handler in handlers {
        fx.table
            .add_method(named, MethodSig::new(*handler, vec![cobra_ptr], vec![err]), true);
    }
    let ret = fx.table.pointer_to(named);

    let pkg = fx.package(rel_path, pkg_name);
    fx.func(pkg, &format!("New{struct_name}"), &[], ctor_params, &[ret]);
    pkg
}

fn cmd_packages(fx: &Fixture, indices: &[usize]) -> Vec<LoadedPackage> {
    indices.iter().map(|&i| fx.packages[i].clone()).collect()
}

#[test]
fn leaf_command_is_detected_by_its_handle_method() {
    let mut fx = Fixture::new();
    let pkg = command_package(&mut fx, "cmd/migrate", "migrate", "Migrate", &["Handle"], &[]);

    let cfg = config();
    let detector = CommandDetector::new(&cfg);
    let commands = detector
        .detect(&fx.table, &cmd_packages(&fx, &[pkg]))
        .unwrap();

    assert_eq!(commands.len(), 1);
    let cmd = &commands[0];
    assert_eq!(cmd.name, "migrate");
    assert_eq!(cmd.struct_name, "Migrate");
    assert_eq!(cmd.func_name, "NewMigrate");
    assert!(cmd.is_single);
    assert!(!cmd.has_deps());
}

#[test]
fn subcommand_handlers_are_sorted_and_kebab_cased() {
    let mut fx = Fixture::new();
    let pkg = command_package(
        &mut fx,
        "cmd/admin/user",
        "user",
        "User",
        &["UpdatePassword", "Create", "CleanSuspended"],
        &[],
    );

    let cfg = config();
    let commands = CommandDetector::new(&cfg)
        .detect(&fx.table, &cmd_packages(&fx, &[pkg]))
        .unwrap();

    let cmd = &commands[0];
    assert_eq!(cmd.name, "admin_user");
    assert!(!cmd.is_single);
    let names: Vec<String> = cmd.handlers.iter().map(|h| h.method_name.clone()).collect();
    assert_eq!(names, vec!["CleanSuspended", "Create", "UpdatePassword"]);
    assert_eq!(cmd.handlers[0].command_name(), "clean-suspended");
    assert_eq!(cmd.handlers[2].command_name(), "update-password");
}

#[test]
fn structs_without_command_or_handler_methods_are_not_commands() {
    let mut fx = Fixture::new();
    let cobra_ptr = cobra_command_ptr(&mut fx);

    // Has Command() but no handlers.
    let bare = fx.table.declare_struct(&format!("{MODULE}/cmd/bare"), "Bare");
    fx.table
        .add_method(bare, MethodSig::new("Command", vec![], vec![cobra_ptr]), true);
    let bare_ptr = fx.table.pointer_to(bare);
    let p1 = fx.package("cmd/bare", "bare");
    fx.func(p1, "NewBare", &[], &[], &[bare_ptr]);

    // Has handlers but no Command().
    let err = fx.error();
    let plain = fx.table.declare_struct(&format!("{MODULE}/cmd/plain"), "Plain");
    fx.table
        .add_method(plain, MethodSig::new("Handle", vec![cobra_ptr], vec![err]), true);
    let plain_ptr = fx.table.pointer_to(plain);
    let p2 = fx.package("cmd/plain", "plain");
    fx.func(p2, "NewPlain", &[], &[], &[plain_ptr]);

    let cfg = config();
    let commands = CommandDetector::new(&cfg)
        .detect(&fx.table, &cmd_packages(&fx, &[p1, p2]))
        .unwrap();
    assert!(commands.is_empty());
}

#[test]
fn commands_are_sorted_by_name_and_the_root_package_is_skipped() {
    let mut fx = Fixture::new();
    let worker = command_package(&mut fx, "cmd/worker", "worker", "Worker", &["Handle"], &[]);
    let admin = command_package(&mut fx, "cmd/admin", "admin", "Admin", &["Serve"], &[]);
    let root = fx.package("cmd", "main");

    let cfg = config();
    let commands = CommandDetector::new(&cfg)
        .detect(&fx.table, &cmd_packages(&fx, &[worker, admin, root]))
        .unwrap();

    let names: Vec<&str> = commands.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["admin", "worker"]);
}

#[test]
fn deferred_pass_binds_a_command_interface_the_map_scan_left_ambiguous() {
    let mut fx = Fixture::new();
    let serve = unary_error_method(&mut fx.table, "Serve");
    let ping = unary_error_method(&mut fx.table, "Ping");
    let iface = fx.iface("internal/contract", "I", vec![serve.clone()]);
    fx.iface("internal/contract", "J", vec![ping.clone()]);
    let pc = fx.package("internal/contract", "contract");

    // Foo satisfies both I and J; J is bound explicitly, which aliases
    // Foo's provider under a second map key.
    let foo = fx.struct_ptr("internal/foo", "Foo");
    let foo_named = fx.table.declare_struct(&format!("{MODULE}/internal/foo"), "Foo");
    fx.table.add_method(foo_named, serve, true);
    fx.table.add_method(foo_named, ping, true);
    let pf = fx.package("internal/foo", "foo");
    fx.func(pf, "NewFoo", &[], &[], &[foo]);

    let bar = fx.struct_ptr("internal/bar", "Bar");
    let pb = fx.package("internal/bar", "bar");
    fx.func(pb, "NewBar", &[], &[iface], &[bar]);

    let cmd_pkg = command_package(&mut fx, "cmd/serve", "serve", "Serve", &["Handle"], &[iface]);

    let mut cfg = config();
    cfg.bindings
        .insert("*foo.Foo".to_string(), vec!["contract.J".to_string()]);

    let provider_packages = cmd_packages(&fx, &[pc, pf, pb]);
    let out = weave_analysis::Scanner::new(&cfg, &weave_analysis::NoIgnore)
        .scan(&fx.table, &provider_packages)
        .unwrap();
    let mut graph = Graph::build(
        &fx.table,
        out.providers,
        &cfg,
        out.pkg_index,
        out.iface_catalogue,
    )
    .expect("graph build should succeed");

    // The map-keyed auto-binding scan saw Foo twice (concrete + alias) and
    // backed off.
    let iface_str = format!("{MODULE}/internal/contract.I");
    assert!(graph.bindings().get(&iface_str).is_none());

    // The command pass counts providers, not map keys, and binds.
    let commands = CommandDetector::new(&cfg)
        .detect(&fx.table, &cmd_packages(&fx, &[cmd_pkg]))
        .unwrap();
    assert!(commands[0].has_deps());

    graph.bind_command_interfaces(&commands);

    let foo_str = format!("*{MODULE}/internal/foo.Foo");
    assert_eq!(graph.bindings().get(&iface_str), Some(&foo_str));

    let needed: Vec<String> = commands[0].params.iter().map(|p| p.type_str.clone()).collect();
    let providers = graph.providers_for_types(&needed).unwrap();
    assert!(graph.validate_entry("serve", &providers).is_empty());
    assert_eq!(
        providers.iter().map(|p| p.func_name.as_str()).collect::<Vec<_>>(),
        vec!["NewFoo"]
    );
}
