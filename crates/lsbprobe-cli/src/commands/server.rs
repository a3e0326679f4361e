use lsbprobe_server::ServerConfig;

pub fn run(host: &str, port: u16, max_upload_mb: usize) {
    let config = ServerConfig {
        host: host.to_string(),
        port,
        max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
    };

    let base = format!("http://{}", config.addr());
    println!("🔬 lsbprobe server v{}", lsbprobe_core::VERSION);
    println!("   {base}");
    println!();
    println!("   Endpoints:");
    println!("     GET  /                API index (try: curl {base})");
    println!("     POST /api/v1/analyze  Analyze raw PNG/BMP/JPEG bytes");
    println!("     GET  /health          Health check");
    println!();
    println!("   Query params for /api/v1/analyze:");
    println!("     name=<label>          Label echoed back in the report");
    println!("   Uploads larger than {max_upload_mb} MiB are rejected.");
    println!();
    println!("   Example:");
    println!("     curl --data-binary @photo.png '{base}/api/v1/analyze?name=photo.png'");
    println!();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start async runtime: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(lsbprobe_server::run_server(config)) {
        eprintln!("Server error on {base}: {e}");
        std::process::exit(1);
    }
}
