use std::path::PathBuf;

use crate::config::CacheConfig;

xflags::xflags! {
    /// Simulate E20 cache.
    cmd sim-args {
        /// The file containing machine code, typically with .bin suffix.
        required program: PathBuf

        /// Cache configuration: size,associativity,blocksize (for one cache)
        /// or size,associativity,blocksize,size,associativity,blocksize
        /// (for two caches).
        optional --cache config: CacheConfig

        /// Stops with an error after this many instructions.
        optional --limit count: u64

        /// Enables verbose mode, tracing every instruction on stderr.
        optional -v, --verbose
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> xflags::Result<SimArgs> {
        SimArgs::from_vec(args.iter().map(Into::into).collect())
    }

    #[test]
    fn test_parse_cache() {
        let args = parse(&["--cache", "64,2,8", "prog.bin"]).unwrap();
        assert_eq!(args.program, PathBuf::from("prog.bin"));
        assert_eq!(args.cache.unwrap().levels[0].num_rows, 4);
        assert!(!args.verbose);
        assert_eq!(args.limit, None);
    }

    #[test]
    fn test_no_cache() {
        let args = parse(&["-v", "prog.bin"]).unwrap();
        assert!(args.cache.is_none());
        assert!(args.verbose);
    }

    #[test]
    fn test_bad_cache() {
        assert!(parse(&["--cache", "64,2", "prog.bin"]).is_err());
        assert!(parse(&["--cache", "60,2,8", "prog.bin"]).is_err());
        assert!(parse(&[]).is_err());
    }
}
