//! Memory structure

pub mod cache;
pub mod inclusive;
pub mod ram;

use std::fmt;
use std::io::Write;

use cache::Cache;
use cache::CacheHistory;
use cache::Lookup;
use ram::Ram;

use crate::error::SimulatorResult;

/// Memory interface implementation.
/// Backing memory is always read and written;
/// the caches only observe the access
pub trait StorageInterface {
    /// Load a word, probing the caches on the way
    fn load(
        &mut self,
        address: u16,
        pc: u16,
        clock: u64,
        sink: &mut impl LogSink,
    ) -> SimulatorResult<u16> {
        let address = Ram::wrap(address);
        self.access(address, AccessType::Read, pc, clock, sink)?;
        Ok(self.ram().get(address))
    }

    /// Store a word, then write it through every cache level
    fn store(
        &mut self,
        address: u16,
        value: u16,
        pc: u16,
        clock: u64,
        sink: &mut impl LogSink,
    ) -> SimulatorResult<()> {
        let address = Ram::wrap(address);
        self.ram().set(address, value);
        self.access(address, AccessType::Write, pc, clock, sink)
    }

    /// Walk the cache levels for one access
    fn access(
        &mut self,
        address: u16,
        access_type: AccessType,
        pc: u16,
        clock: u64,
        sink: &mut impl LogSink,
    ) -> SimulatorResult<()> {
        for k in 0..self.n() {
            let cache = self.caches(k);
            let lookup = cache.lookup(address);
            let hit = matches!(lookup, Lookup::Hit { .. });

            let kind = match (access_type, hit) {
                (AccessType::Write, _) => EventKind::Store,
                (AccessType::Read, true) => EventKind::Hit,
                (AccessType::Read, false) => EventKind::Miss,
            };
            match lookup {
                Lookup::Hit { index, slot } => {
                    cache.record_hit();
                    cache.access_index(index, slot, clock);
                }
                Lookup::Miss { index, tag, victim } => {
                    cache.record_miss();
                    cache.allocate(index, tag, victim, clock);
                }
            }

            sink.record(CacheEvent {
                level: k + 1,
                kind,
                pc,
                address,
                row: lookup.index(),
            })?;

            // Reads stop at the first level holding the block,
            // writes go through all of them
            if hit && access_type == AccessType::Read {
                break;
            }
        }
        Ok(())
    }

    fn caches(&mut self, k: usize) -> &mut Cache;
    fn n(&self) -> usize;
    fn ram(&mut self) -> &mut Ram;

    /// Return the list of cache histories
    fn get_history(&mut self) -> Vec<CacheHistory> {
        let mut histories = Vec::new();
        for k in 0..self.n() {
            histories.push(self.caches(k).history);
        }
        histories
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AccessType {
    Read,
    Write,
}

/// Kind of a logged cache event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Hit,
    Miss,
    /// Any store, whether or not the level held the block
    Store,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EventKind::Hit => "HIT",
            EventKind::Miss => "MISS",
            EventKind::Store => "SW",
        })
    }
}

/// One log entry: a single level touched by a single access
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheEvent {
    /// 1-based cache level
    pub level: usize,
    pub kind: EventKind,
    /// Address of the lw/sw instruction
    pub pc: u16,
    /// Effective memory address
    pub address: u16,
    pub row: usize,
}

// Downstream tools parse this layout; keep it byte-for-byte
impl fmt::Display for CacheEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = format!("L{} {}", self.level, self.kind);
        write!(
            f,
            "{:<8} pc:{:>5}\taddr:{:>5}\trow:{:>4}",
            status, self.pc, self.address, self.row
        )
    }
}

/// Destination of cache events
pub trait LogSink {
    fn record(&mut self, event: CacheEvent) -> SimulatorResult<()>;
}

/// Keeps every event, mostly for tests
impl LogSink for Vec<CacheEvent> {
    fn record(&mut self, event: CacheEvent) -> SimulatorResult<()> {
        self.push(event);
        Ok(())
    }
}

/// Writes one formatted line per event
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write a free-form line, e.g. a configuration report
    pub fn line(&mut self, line: impl fmt::Display) -> SimulatorResult<()> {
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }

    pub fn flush(&mut self) -> SimulatorResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LogSink for WriterSink<W> {
    fn record(&mut self, event: CacheEvent) -> SimulatorResult<()> {
        self.line(event)
    }
}

/// Drops every event; statistics are still kept by the caches
pub struct DiscardSink;

impl LogSink for DiscardSink {
    fn record(&mut self, _: CacheEvent) -> SimulatorResult<()> {
        Ok(())
    }
}
