//! Codon and motif lookups on the coding strand.

use regex::bytes::Regex;

use crate::model::{Direction, Frame, Interval, VirusGenome};

const STOP_CODONS: [&[u8; 3]; 3] = [b"TAA", b"TAG", b"TGA"];

/// A motif hit on the coding strand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MotifSite {
    /// Genome bases covered by the match.
    pub span: Interval,
    /// First matched base in transcription direction.
    pub start: u32,
}

/// Complement each base and reverse the sequence. Non-ACGT bytes are kept.
pub(crate) fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter()
        .rev()
        .map(|&base| match base {
            b'A' => b'T',
            b'T' | b'U' => b'A',
            b'C' => b'G',
            b'G' => b'C',
            other => other,
        })
        .collect()
}

/// Whether a codon (read in transcription direction) is a stop codon.
pub(crate) fn is_stop(codon: &[u8]) -> bool {
    let codon: Vec<u8> = codon
        .iter()
        .map(|&base| if base == b'U' { b'T' } else { base })
        .collect();
    STOP_CODONS.iter().any(|stop| stop.as_slice() == codon.as_slice())
}

/// Codon whose lowest coordinate is `lowest`, read on the coding strand.
pub(crate) fn codon_at(genome: &VirusGenome, lowest: u32, direction: Direction) -> Option<Vec<u8>> {
    let range = Interval::new(lowest, lowest.checked_add(2)?)?;
    let bases = genome.slice(range)?;
    Some(match direction {
        Direction::Forward => bases.to_vec(),
        Direction::Reverse => reverse_complement(bases),
    })
}

/// Lowest coordinates of every complete in-frame codon inside `range`,
/// ascending.
pub(crate) fn codon_starts(range: Interval, frame: Frame) -> Vec<u32> {
    let shift = (frame.offset() + 3 - range.begin() % 3) % 3;
    let first = range.begin() + shift;
    (first..)
        .step_by(3)
        .take_while(|&q| q.checked_add(2).is_some_and(|last| last <= range.end()))
        .collect()
}

/// Every non-empty match of `motif` inside `region` on the coding strand.
pub(crate) fn motif_sites(
    genome: &VirusGenome,
    region: Interval,
    direction: Direction,
    motif: &Regex,
) -> Vec<MotifSite> {
    let Some(bases) = genome.slice(region) else {
        return Vec::new();
    };
    match direction {
        Direction::Forward => motif
            .find_iter(bases)
            .filter(|hit| !hit.is_empty())
            .filter_map(|hit| {
                let span = Interval::new(
                    region.begin() + hit.start() as u32,
                    region.begin() + hit.end() as u32 - 1,
                )?;
                Some(MotifSite {
                    span,
                    start: span.begin(),
                })
            })
            .collect(),
        Direction::Reverse => {
            let coding = reverse_complement(bases);
            motif
                .find_iter(&coding)
                .filter(|hit| !hit.is_empty())
                .filter_map(|hit| {
                    let span = Interval::new(
                        region.end() - (hit.end() as u32 - 1),
                        region.end() - hit.start() as u32,
                    )?;
                    Some(MotifSite {
                        span,
                        start: span.end(),
                    })
                })
                .collect()
        }
    }
}

/// Move `offset` bases from `start` in transcription direction.
pub(crate) fn offset_position(start: u32, offset: i32, direction: Direction) -> Option<u32> {
    let moved = match direction {
        Direction::Forward => i64::from(start) + i64::from(offset),
        Direction::Reverse => i64::from(start) - i64::from(offset),
    };
    u32::try_from(moved).ok()
}
