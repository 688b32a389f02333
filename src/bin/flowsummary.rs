use std::error::Error;
use std::path::{Path, PathBuf};

use log::{error, info};
use rayon::prelude::*;
use structopt::StructOpt;

use flowsummary::render::{self, DatasetInfo};
use flowsummary::{inout, summarize, Dimension};

#[derive(Clone, Debug, StructOpt)]
#[structopt(
    name = "flowsummary",
    about = "Summarize csv_hist flow histograms as statistics and CDF tables.",
    rename_all = "kebab-case"
)]
struct Opt {
    #[structopt(parse(from_os_str), required = true)]
    /// The csv_hist files to summarize
    files: Vec<PathBuf>,
    #[structopt(short = "x")]
    /// Dimension of the CDF x axis: length, size, duration or rate (detected if omitted)
    x_val: Option<Dimension>,
    #[structopt(long, default_value = "4")]
    threads: usize,
    #[structopt(long, parse(from_os_str))]
    /// Directory where CSV copies of both tables are written
    dump_csv: Option<PathBuf>,
    #[structopt(long, default_value = "XXX")]
    dataset_name: String,
    #[structopt(long, default_value = "XXX")]
    exporter: String,
    #[structopt(long, default_value = "Ethernet")]
    l2_technology: String,
    #[structopt(long, default_value = "none")]
    sampling_rate: String,
    #[structopt(long, default_value = "300")]
    /// Active timeout of the exporter, in seconds
    active_timeout: u32,
    #[structopt(long, default_value = "15")]
    /// Inactive timeout of the exporter, in seconds
    inactive_timeout: u32,
}

type JobResult = Result<String, Box<dyn Error + Send + Sync>>;

impl Opt {
    fn dataset_info(&self) -> DatasetInfo {
        DatasetInfo {
            name: self.dataset_name.clone(),
            exporter: self.exporter.clone(),
            l2_technology: self.l2_technology.clone(),
            sampling_rate: self.sampling_rate.clone(),
            active_timeout_secs: self.active_timeout,
            inactive_timeout_secs: self.inactive_timeout,
        }
    }
}

fn summarize_file(file: &Path, opts: &Opt, info: &DatasetInfo) -> JobResult {
    let table = inout::load_table(file)?;
    let summary = summarize(&table, opts.x_val)?;
    if let Some(dir) = &opts.dump_csv {
        std::fs::create_dir_all(dir)?;
        let name = file.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let stats_path = dir.join(format!("{}.stats.csv", name));
        let cdf_path = dir.join(format!("{}.cdf.csv", name));
        inout::dump_stats(&summary.stats, &stats_path)?;
        inout::dump_distribution(&summary.distribution, &cdf_path)?;
        info!("wrote {} and {}", stats_path.display(), cdf_path.display());
    }
    Ok(render::summary(&summary, info))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let opts = Opt::from_args();
    let info = opts.dataset_info();

    let pool = rayon::ThreadPoolBuilder::new().num_threads(opts.threads).build()?;
    let results: Vec<(&PathBuf, JobResult)> = pool.install(|| {
        opts.files.par_iter().map(|file| (file, summarize_file(file, &opts, &info))).collect()
    });

    let mut failures: usize = 0;
    for (file, result) in results {
        match result {
            Ok(text) => {
                println!("% {}", file.display());
                print!("{}", text);
            }
            Err(e) => {
                error!("{}: could not summarize", file.display());
                error!("{}", e);
                failures += 1;
            }
        }
    }
    check_failures(failures, opts.files.len())
}

fn check_failures(failures: usize, total: usize) -> Result<(), Box<dyn Error>> {
    if failures > 0 {
        return Err(format!("{} of {} files failed", failures, total).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_failures() {
        assert!(check_failures(0, 3).is_ok());
        let err = check_failures(2, 3).unwrap_err();
        assert_eq!(err.to_string(), "2 of 3 files failed");
    }
}
