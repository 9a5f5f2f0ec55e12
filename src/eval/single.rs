
use sim_lib::config::CacheConfig;
use sim_lib::cpu::CPUPolicy;
use sim_lib::loader;
use sim_lib::memory::cache::CachePolicy;
use sim_lib::run_wrapper::evaluate;

/// Programs that never halt are cut off here
const INSTRUCTION_LIMIT: u64 = 50_000_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let param_tokens: Vec<String> = std::env::args().collect();
    let program_path = param_tokens
        .get(1)
        .ok_or("You should specify exactly one machine code file")?;
    let image = loader::load_file(Path::new(program_path))?;

    let policy = CPUPolicy { max_instructions: Some(INSTRUCTION_LIMIT) };

    // Plot line series for each cache size
    // For a fixed cache size, vary the block size
    // Performance metric: L1 miss rate (direct-mapped)
    let cache_sizes = vec![16, 32, 64, 128, 256];
    let block_sizes = vec![1, 2, 4, 8, 16];

    // Propagate the data
    let mut data: Vec<Vec<(usize, f64)>> = vec![vec![]; cache_sizes.len()];
    for (i, cache_size) in cache_sizes.iter().enumerate() {
        for block_size in block_sizes.iter() {
            let config = CacheConfig::make(vec![CachePolicy::make(
                *cache_size,
                1,
                *block_size,
            )])?;
            let stats = evaluate(&image, &config, policy)?;
            data[i].push((*block_size, stats.caches[0].get_miss_rate()));
        }
    }

    // Plot the data
    use plotters::prelude::*;
    use std::path::Path;

    let program_base_name = Path::new(program_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| program_path.clone());
    let plot_title =
        format!("Single level evaluation (miss rate): {}", program_base_name);
    std::fs::create_dir_all("eval")?;
    let output_path = format!("eval/single_eval_{}.svg", program_base_name);

    let root = SVGBackend::new(output_path.as_str(), (800, 600))
        .into_drawing_area();
    root.fill(&WHITE)?;

    let mut ctx = ChartBuilder::on(&root)
        .caption(plot_title.as_str(), ("sans-serif", 40).into_font())
        .margin(5)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(1..16, 0.0..1.05)?;
    ctx.configure_mesh()
        .x_desc("Block size")
        .y_desc("Miss rate")
        .draw()?;

    for (i, cache_size) in cache_sizes.iter().enumerate() {
        let series = data[i].iter().map(|(x, y)| (*x as i32, *y));
        let label = format!("Cache size = {}", cache_size);
        let color = Palette99::pick(i).to_rgba();
        ctx.draw_series(LineSeries::new(series, color))?
            .label(label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color)
            });
    }

    ctx.configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;

    eprintln!("Wrote {}", output_path);
    Ok(())
}
