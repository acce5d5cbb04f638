use anyhow::{Context, Result};

fn main() -> Result<()> {
    // Build the contextupdate.proto code.
    tonic_build::configure()
        .out_dir("src/grpc")
        .build_client(false)
        .build_server(true)
        .compile(&["proto/contextupdate.proto"], &["proto"])
        .context("error compiling contextupdate proto")?;

    Ok(())
}
