use std::io::Result;

fn main() -> Result<()> {
    // Client side of the daemon contract. `daemon-service` compiles the same file
    // into the server used by the integration tests.
    let proto_files = &["../proto/daemon.proto"];
    let proto_folder = "../proto";

    println!("cargo:rerun-if-changed=../proto/daemon.proto");

    tonic_prost_build::configure()
        .build_server(false)
        .build_client(true)
        .compile_protos(proto_files, &[proto_folder])?;

    Ok(())
}
