use std::io::Result;

fn main() -> Result<()> {
    let proto_files = &["../proto/daemon.proto"];
    let proto_folder = "../proto";

    println!("cargo:rerun-if-changed=../proto/daemon.proto");

    tonic_prost_build::configure()
        .build_client(false)
        .compile_protos(proto_files, &[proto_folder])?;

    Ok(())
}
