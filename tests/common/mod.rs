#![allow(dead_code)]

use std::sync::{Arc, Once};

use tracing_subscriber::EnvFilter;
use vireo::model::GeneAttributes;
use vireo::{Alignment, AlignmentFragment, Direction, Exon, Frame, Interval, Model, ViralProtein, VirusGenome};

static TRACING: Once = Once::new();

/// Route library logs to the test harness; filter with `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

pub fn iv(begin: u32, end: u32) -> Interval {
    Interval::new(begin, end).expect("valid interval")
}

pub fn fragment(aa: (u32, u32), nt: (u32, u32)) -> AlignmentFragment {
    AlignmentFragment::new(iv(aa.0, aa.1), iv(nt.0, nt.1), Direction::Forward, Frame::One)
}

pub fn fragment_on(
    aa: (u32, u32),
    nt: (u32, u32),
    direction: Direction,
    frame: Frame,
) -> AlignmentFragment {
    AlignmentFragment::new(iv(aa.0, aa.1), iv(nt.0, nt.1), direction, frame)
}

/// The six fragments whose maximal chains are known by hand.
pub fn six_fragments() -> Vec<AlignmentFragment> {
    vec![
        fragment((0, 100), (10, 300)),
        fragment((60, 120), (180, 360)),
        fragment((65, 110), (195, 330)),
        fragment((121, 150), (370, 460)),
        fragment((130, 170), (330, 500)),
        fragment((171, 180), (650, 670)),
    ]
}

/// Genome of `len` copies of `C`, so no stop codon or motif appears by
/// chance.
pub fn plain_genome(id: &str, len: usize, gaps: Vec<Interval>) -> Arc<VirusGenome> {
    Arc::new(VirusGenome::new(id, vec![b'C'; len], gaps).expect("ordered gaps"))
}

/// `len` bases of `C` with `motif` written at `at`.
pub fn genome_with_motif(id: &str, len: usize, at: usize, motif: &[u8]) -> Arc<VirusGenome> {
    let mut sequence = vec![b'C'; len];
    sequence[at..at + motif.len()].copy_from_slice(motif);
    Arc::new(VirusGenome::new(id, sequence, Vec::new()).expect("no gaps"))
}

pub fn protein(id: &str, length: u32) -> Arc<ViralProtein> {
    Arc::new(ViralProtein::new(id, length))
}

pub fn protein_with(id: &str, length: u32, attributes: GeneAttributes) -> Arc<ViralProtein> {
    Arc::new(ViralProtein::new(id, length).with_attributes(attributes))
}

pub fn alignment(
    protein: Arc<ViralProtein>,
    genome: Arc<VirusGenome>,
    fragments: Vec<AlignmentFragment>,
) -> Arc<Alignment> {
    Arc::new(Alignment::new(protein, genome, fragments, 10.0))
}

/// Forward model over `ranges`, every exon in frame one.
pub fn model_with_exons(genome: Arc<VirusGenome>, ranges: &[(u32, u32)]) -> Model {
    let exons = ranges
        .iter()
        .map(|&(begin, end)| Exon::new(iv(begin, end), Frame::One))
        .collect();
    Model::new(
        alignment(protein("p1", 5_000), genome, Vec::new()),
        Direction::Forward,
        exons,
    )
}
