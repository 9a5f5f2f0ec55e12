use std::path::Path;

use sim_lib::config::CacheConfig;
use sim_lib::cpu::CPUPolicy;
use sim_lib::loader;
use sim_lib::run_wrapper::evaluate;

/// Programs that never halt are cut off here
const INSTRUCTION_LIMIT: u64 = 50_000_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let param_tokens: Vec<String> = std::env::args().collect();
    let program_path = param_tokens
        .get(1)
        .ok_or("You should specify exactly one machine code file")?;
    let image = loader::load_file(Path::new(program_path))?;
    let program_base_name = Path::new(program_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| program_path.clone());

    std::fs::create_dir_all("eval")?;
    let output_path = format!("eval/multi_eval_{}.csv", program_base_name);

    let mut writer = csv::Writer::from_path(&output_path)?;
    writer.write_record([
        "Config",
        "L1 hits",
        "L1 misses",
        "L1 miss rate",
        "L2 hits",
        "L2 misses",
        "L2 miss rate",
    ])?;

    let policy = CPUPolicy { max_instructions: Some(INSTRUCTION_LIMIT) };

    // Single-level caches, then the same L1s backed by a larger L2
    let configs = [
        "16,1,1",
        "16,4,1",
        "32,1,4",
        "32,2,4",
        "64,4,4",
        "16,1,1,256,4,4",
        "16,4,1,256,4,4",
        "32,1,4,256,4,8",
        "32,2,4,512,8,8",
        "64,4,4,1024,16,8",
    ];
    for text in configs {
        let config: CacheConfig = text.parse()?;
        let stats = evaluate(&image, &config, policy)?;

        let mut record = vec![text.to_string()];
        for k in 0..2 {
            match stats.caches.get(k) {
                Some(history) => {
                    record.push(history.num_hit.to_string());
                    record.push(history.num_miss.to_string());
                    record.push(format!("{:.3}", history.get_miss_rate()));
                }
                None => record.extend(["-", "-", "-"].map(String::from)),
            }
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;

    eprintln!("Wrote {}", output_path);
    Ok(())
}
