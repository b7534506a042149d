// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
use std::io::Result;

fn main() -> Result<()> {
    let protoc_path = protoc_bin_vendored::protoc_bin_path()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let well_known = protoc_bin_vendored::include_path()
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    // SAFETY: build scripts are single-threaded
    unsafe { std::env::set_var("PROTOC", protoc_path) };

    let out_dir = std::path::PathBuf::from(
        std::env::var("OUT_DIR").map_err(|e| std::io::Error::other(e.to_string()))?,
    );

    println!("cargo:rerun-if-changed=proto/todolist.proto");

    // Compile todo list protocol (server for todo-core, client for todo-client and tests)
    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        // Descriptor set served by gRPC server reflection
        .file_descriptor_set_path(out_dir.join("todolist_descriptor.bin"))
        .compile_protos(
            &["proto/todolist.proto"],
            &[std::path::PathBuf::from("proto/"), well_known],
        )?;

    Ok(())
}
