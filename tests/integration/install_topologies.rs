use std::path::{Path, PathBuf};

use anyhow::Result;
use openclaw_launcher::{
    entrypoint::{resolve_cli_entrypoint, CandidateOrigin, Invocation, SelectionRule, StaticLookupProbe},
    launch::{resolve_gateway_program_args, GatewayFlag, LaunchOptions},
    lib::errors::LaunchError,
};

use crate::common::{InstallTree, BINARY_NAME};

const NODE: &str = "/usr/local/bin/node";

fn invocation(tree: &InstallTree, invoked: &Path) -> Invocation {
    Invocation::new(Some(PathBuf::from(NODE)), invoked.to_path_buf(), tree.root())
}

fn program_arguments(runtime: &str, entrypoint: &Path, port: u16) -> Vec<String> {
    vec![
        runtime.to_string(),
        entrypoint.display().to_string(),
        "gateway".to_string(),
        "--port".to_string(),
        port.to_string(),
    ]
}

#[tokio::test]
async fn global_npm_install_keeps_invoked_entrypoint() -> Result<()> {
    let tree = InstallTree::new();
    let entry = tree.file("usr/lib/node_modules/openclaw/dist/index.js");
    let probe = StaticLookupProbe::new();

    let args = resolve_gateway_program_args(
        &invocation(&tree, &entry),
        &LaunchOptions::new(18789),
        BINARY_NAME,
        &probe,
    )
    .await?;

    assert_eq!(args.program_arguments, program_arguments(NODE, &entry, 18789));
    assert!(
        probe.calls().is_empty(),
        "stable invocation must not consult the search path: {:?}",
        probe.calls()
    );
    Ok(())
}

#[tokio::test]
async fn global_pnpm_install_prefers_hoisted_path() -> Result<()> {
    let tree = InstallTree::new();
    let pinned = tree.file(
        "pnpm/global/5/node_modules/.pnpm/openclaw@2026.1.5_ab12/node_modules/openclaw/dist/index.js",
    );
    tree.link(
        "pnpm/global/5/node_modules/openclaw",
        ".pnpm/openclaw@2026.1.5_ab12/node_modules/openclaw",
    );
    let bin = tree.link(
        "pnpm/bin/openclaw",
        "../global/5/node_modules/openclaw/dist/index.js",
    );
    let probe = StaticLookupProbe::new().with_answer(BINARY_NAME, &bin);

    let resolved =
        resolve_cli_entrypoint(&invocation(&tree, &pinned), BINARY_NAME, &probe).await?;

    assert_eq!(
        resolved.path,
        tree.path("pnpm/global/5/node_modules/openclaw/dist/index.js")
    );
    assert_eq!(resolved.origin, CandidateOrigin::StableEquivalent);
    assert_eq!(resolved.rule, SelectionRule::SameInstall);
    assert!(probe.was_called_for(BINARY_NAME));
    Ok(())
}

#[tokio::test]
async fn pinned_invocation_is_stabilized_without_path_binary() -> Result<()> {
    let tree = InstallTree::new();
    let pinned = tree.file(
        "g/node_modules/.pnpm/openclaw@2026.1.5_ab12/node_modules/openclaw/dist/index.js",
    );
    tree.link(
        "g/node_modules/openclaw",
        ".pnpm/openclaw@2026.1.5_ab12/node_modules/openclaw",
    );
    let probe = StaticLookupProbe::new();

    let resolved =
        resolve_cli_entrypoint(&invocation(&tree, &pinned), BINARY_NAME, &probe).await?;

    assert_eq!(resolved.path, tree.path("g/node_modules/openclaw/dist/index.js"));
    assert_eq!(resolved.origin, CandidateOrigin::StableEquivalent);
    Ok(())
}

#[tokio::test]
async fn npx_shim_resolves_through_real_path() -> Result<()> {
    let tree = InstallTree::new();
    let entry = tree.file("npx/9a1/node_modules/openclaw/dist/index.js");
    let shim = tree.link(
        "npx/9a1/node_modules/.bin/openclaw",
        "../openclaw/dist/index.js",
    );
    let probe = StaticLookupProbe::new();

    let args = resolve_gateway_program_args(
        &invocation(&tree, &shim),
        &LaunchOptions::new(18789),
        BINARY_NAME,
        &probe,
    )
    .await?;

    assert_eq!(args.entrypoint(), Some(entry.display().to_string().as_str()));
    Ok(())
}

#[tokio::test]
async fn wrapper_script_falls_back_to_built_sibling() -> Result<()> {
    let tree = InstallTree::new();
    let wrapper = tree.file("npx/9a1/node_modules/openclaw/openclaw.mjs");
    let entry = tree.file("npx/9a1/node_modules/openclaw/dist/index.js");
    let probe = StaticLookupProbe::new();

    let resolved =
        resolve_cli_entrypoint(&invocation(&tree, &wrapper), BINARY_NAME, &probe).await?;

    assert_eq!(resolved.path, entry);
    assert_eq!(resolved.origin, CandidateOrigin::DerivedSibling);
    assert_eq!(resolved.rule, SelectionRule::DerivedSibling);
    Ok(())
}

#[tokio::test]
async fn dangling_npx_shim_falls_back_to_built_index() -> Result<()> {
    let tree = InstallTree::new();
    let shim = tree.link(
        "npx/9a1/node_modules/.bin/openclaw",
        "../openclaw/openclaw.mjs",
    );
    let index = tree.file("npx/9a1/node_modules/openclaw/dist/index.js");
    let probe = StaticLookupProbe::new();

    let args = resolve_gateway_program_args(
        &invocation(&tree, &shim),
        &LaunchOptions::new(18789),
        BINARY_NAME,
        &probe,
    )
    .await?;

    assert_eq!(args.program_arguments, program_arguments(NODE, &index, 18789));
    Ok(())
}

#[tokio::test]
async fn non_utf8_install_path_is_rejected() {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

    let tree = InstallTree::new();
    let checkout = tree.root().join(OsStr::from_bytes(b"dev\xffclaw"));
    let entry = checkout.join("dist/entry.js");
    std::fs::create_dir_all(checkout.join("dist")).expect("can create non-utf-8 directory");
    std::fs::write(&entry, b"// built").expect("can write entry");
    let probe = StaticLookupProbe::new();

    let error = resolve_gateway_program_args(
        &invocation(&tree, &entry),
        &LaunchOptions::new(18789),
        BINARY_NAME,
        &probe,
    )
    .await
    .expect_err("a non-utf-8 entrypoint cannot be written verbatim");

    match error {
        LaunchError::NonUtf8Path { path } => assert_eq!(path, entry),
        other => panic!("Unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn wrapper_script_prefers_entry_over_index() -> Result<()> {
    let tree = InstallTree::new();
    let wrapper = tree.file("g/node_modules/openclaw/openclaw.mjs");
    let entry = tree.file("g/node_modules/openclaw/dist/entry.js");
    tree.file("g/node_modules/openclaw/dist/index.js");
    let probe = StaticLookupProbe::new();

    let resolved =
        resolve_cli_entrypoint(&invocation(&tree, &wrapper), BINARY_NAME, &probe).await?;

    assert_eq!(resolved.path, entry);
    Ok(())
}

#[tokio::test]
async fn dev_checkout_ignores_unrelated_global_install() -> Result<()> {
    let tree = InstallTree::new();
    let dev = tree.file("dev/openclaw/dist/entry.js");
    tree.file("usr/lib/node_modules/openclaw/dist/index.js");
    let global = tree.link(
        "usr/bin/openclaw",
        "../lib/node_modules/openclaw/dist/index.js",
    );
    let probe = StaticLookupProbe::new().with_answer(BINARY_NAME, &global);

    let resolved = resolve_cli_entrypoint(&invocation(&tree, &dev), BINARY_NAME, &probe).await?;

    assert_eq!(resolved.path, dev);
    assert_eq!(resolved.origin, CandidateOrigin::Invoked);
    Ok(())
}

#[tokio::test]
async fn local_install_ignores_global_binary_from_another_install() -> Result<()> {
    let tree = InstallTree::new();
    let wrapper = tree.file("project/node_modules/openclaw/openclaw.mjs");
    let local = tree.file("project/node_modules/openclaw/dist/index.js");
    tree.file("usr/lib/node_modules/openclaw/dist/index.js");
    let global = tree.link(
        "usr/bin/openclaw",
        "../lib/node_modules/openclaw/dist/index.js",
    );
    let probe = StaticLookupProbe::new().with_answer(BINARY_NAME, &global);

    let resolved =
        resolve_cli_entrypoint(&invocation(&tree, &wrapper), BINARY_NAME, &probe).await?;

    assert_eq!(resolved.path, local);
    assert!(probe.was_called_for(BINARY_NAME));
    Ok(())
}

#[tokio::test]
async fn unbuilt_checkout_fails_without_substituting_path_binary() -> Result<()> {
    let tree = InstallTree::new();
    let wrapper = tree.file("src/openclaw/openclaw.mjs");
    tree.file("usr/lib/node_modules/openclaw/dist/index.js");
    let global = tree.link(
        "usr/bin/openclaw",
        "../lib/node_modules/openclaw/dist/index.js",
    );
    let probe = StaticLookupProbe::new().with_answer(BINARY_NAME, &global);

    let error = resolve_gateway_program_args(
        &invocation(&tree, &wrapper),
        &LaunchOptions::new(18789),
        BINARY_NAME,
        &probe,
    )
    .await
    .expect_err("an unbuilt checkout has no entrypoint");

    assert!(error.is_entrypoint_not_found());
    assert!(error.to_string().contains("Cannot find built CLI"));
    assert!(
        error
            .to_string()
            .contains(&tree.path("src/openclaw/dist/entry.js").display().to_string()),
        "message should list attempted paths: {error}"
    );
    assert!(!probe.was_called_for(BINARY_NAME));
    Ok(())
}

#[tokio::test]
async fn repeated_resolution_is_deterministic() -> Result<()> {
    let tree = InstallTree::new();
    tree.file("npx/9a1/node_modules/openclaw/dist/index.js");
    let shim = tree.link(
        "npx/9a1/node_modules/.bin/openclaw",
        "../openclaw/dist/index.js",
    );
    let options = LaunchOptions::new(19001)
        .with_flag(GatewayFlag::Tailscale, "serve")
        .with_flag(GatewayFlag::Bind, "lan");
    let probe = StaticLookupProbe::new();

    let first =
        resolve_gateway_program_args(&invocation(&tree, &shim), &options, BINARY_NAME, &probe)
            .await?;
    let second =
        resolve_gateway_program_args(&invocation(&tree, &shim), &options, BINARY_NAME, &probe)
            .await?;

    assert_eq!(first, second);
    assert_eq!(
        &first.program_arguments[2..],
        ["gateway", "--port", "19001", "--bind", "lan", "--tailscale", "serve"]
    );
    Ok(())
}

#[tokio::test]
async fn missing_runtime_is_reported() -> Result<()> {
    let tree = InstallTree::new();
    let entry = tree.file("g/node_modules/openclaw/dist/index.js");
    let invocation = Invocation::new(None, entry, tree.root());
    let probe = StaticLookupProbe::new();

    let error = resolve_gateway_program_args(
        &invocation,
        &LaunchOptions::new(18789),
        BINARY_NAME,
        &probe,
    )
    .await
    .expect_err("no runtime is known");

    assert!(matches!(error, LaunchError::RuntimeNotFound { runtime: "node" }));
    assert!(probe.was_called_for("node"));
    Ok(())
}
