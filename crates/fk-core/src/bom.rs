//! Cut list (bill of materials)

use std::fmt;

use fk_cad::CadKernel;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::assembly::SolvedAssembly;
use crate::part::Part;

/// Group of identical pieces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutListEntry {
    /// Paths of every piece in the group
    pub parts: Vec<String>,
    /// Stock dimensions, longest first
    pub stock: [f32; 3],
    /// Number of through-cuts per piece
    pub cutouts: usize,
    /// Net material volume of one piece
    pub volume: f32,
}

impl CutListEntry {
    pub fn quantity(&self) -> usize {
        self.parts.len()
    }
}

/// Pieces to cut for a solved design
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CutList {
    pub entries: Vec<CutListEntry>,
}

/// Stock dimensions sorted longest first
fn stock_of(part: &Part) -> [f32; 3] {
    let mut dims = part.size().to_array();
    dims.sort_by(|a, b| b.total_cmp(a));
    dims
}

impl CutList {
    /// Group every part in the tree by stock size and cuts
    pub fn from_assembly(kernel: &dyn CadKernel, assembly: &SolvedAssembly) -> Self {
        // Keyed on hundredths of a millimetre
        let mut groups: IndexMap<([i64; 3], Vec<String>), CutListEntry> = IndexMap::new();

        for placed in assembly.placed_parts() {
            let stock = stock_of(placed.part);
            let key = (
                stock.map(|v| (v * 1000.0).round() as i64),
                placed
                    .part
                    .solid
                    .cuts
                    .iter()
                    .map(|cut| format!("{:?}", cut))
                    .collect(),
            );
            groups
                .entry(key)
                .or_insert_with(|| CutListEntry {
                    parts: Vec::new(),
                    stock,
                    cutouts: placed.part.solid.cuts.len(),
                    volume: kernel.volume(&placed.part.solid),
                })
                .parts
                .push(placed.path);
        }

        Self {
            entries: groups.into_values().collect(),
        }
    }

    /// Total number of pieces
    pub fn piece_count(&self) -> usize {
        self.entries.iter().map(CutListEntry::quantity).sum()
    }

    /// Total net material volume
    pub fn total_volume(&self) -> f32 {
        self.entries
            .iter()
            .map(|e| e.volume * e.quantity() as f32)
            .sum()
    }
}

impl fmt::Display for CutList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            let [l, w, t] = entry.stock;
            write!(
                f,
                "{:>2} x {:>7.2} x {:>6.2} x {:>5.2} cm",
                entry.quantity(),
                l,
                w,
                t
            )?;
            if entry.cutouts > 0 {
                write!(f, " ({} cutouts)", entry.cutouts)?;
            }
            writeln!(f, "  {}", entry.parts.join(", "))?;
        }
        write!(
            f,
            "{} pieces, {:.0} cm3 of material",
            self.piece_count(),
            self.total_volume()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::Design;
    use crate::params::DesignParams;
    use approx::assert_relative_eq;
    use fk_cad::PrismKernel;

    fn cut_list() -> CutList {
        let design = Design::build(&DesignParams::default()).unwrap();
        CutList::from_assembly(&PrismKernel::new(), &design.assembly)
    }

    fn entry<'a>(list: &'a CutList, part: &str) -> &'a CutListEntry {
        list.entries
            .iter()
            .find(|e| e.parts.iter().any(|p| p == part))
            .unwrap_or_else(|| panic!("no entry for {}", part))
    }

    #[test]
    fn test_identical_parts_grouped() {
        let list = cut_list();
        assert_eq!(list.piece_count(), 16);

        assert_eq!(entry(&list, "leg1").quantity(), 4);
        assert_eq!(entry(&list, "side_panel1").quantity(), 2);
        assert_eq!(entry(&list, "wall_shelf/v_l").quantity(), 2);
        assert_eq!(entry(&list, "wall_shelf/bracket_l").quantity(), 2);
        // Same stock, but only one of them has drawer openings
        assert_eq!(entry(&list, "rear_panel").quantity(), 1);
        assert_eq!(entry(&list, "face_frame").cutouts, 2);
    }

    #[test]
    fn test_stock_sorted() {
        let list = cut_list();
        let leg = entry(&list, "leg1");
        assert_relative_eq!(leg.stock[0], 83.92, epsilon = 1e-4);
        assert_relative_eq!(leg.stock[1], 5.08, epsilon = 1e-5);
        assert_relative_eq!(leg.stock[2], 5.08, epsilon = 1e-5);
    }

    #[test]
    fn test_display_lists_every_entry() {
        let list = cut_list();
        let text = list.to_string();
        assert_eq!(text.lines().count(), list.entries.len() + 1);
        assert!(text.contains("leg1, leg2, leg3, leg4"));
    }
}
