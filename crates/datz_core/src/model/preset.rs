//! Built-in curriculum templates used for first-run seeding.
//!
//! # Invariants
//! - Order is stable; callers address presets by position.
//! - The table is kept verbatim, including the two `3MG` entries that differ
//!   only by `Latin` replacing `Option`.

use crate::model::year::{CombiMeta, SubjectMeta, Year};

fn ms(name: &str, coef: f32) -> SubjectMeta {
    SubjectMeta::new(name, coef)
}

fn mc(name: &str, coef: f32, combi_meta: CombiMeta) -> SubjectMeta {
    SubjectMeta::composite(name, coef, combi_meta)
}

fn co(parts: &[(&str, f32)]) -> CombiMeta {
    CombiMeta::new(parts.iter().map(|(name, coef)| ms(name, *coef)).collect())
}

fn art_combi() -> CombiMeta {
    co(&[("Dessin", 1.0), ("Graphisme", 1.0), ("HistoArt", 1.0)])
}

fn year(name: &str, subjects: Vec<SubjectMeta>) -> Year {
    Year::new(name, subjects)
}

/// Returns the fixed preset catalog, in display order.
pub fn preset_years() -> Vec<Year> {
    vec![
        year(
            "7e",
            vec![
                ms("Français", 4.0),
                ms("Allemand", 4.0),
                ms("Mathématiques", 4.0),
                ms("SciNa", 3.0),
                ms("Histoire", 2.0),
                ms("VieSo", 2.0),
                ms("Géographie", 2.0),
                ms("Artistique", 1.0),
                ms("EduMusic", 1.0),
                ms("Luxembourgeois", 1.0),
                ms("EduPhys", 1.0),
            ],
        ),
        year(
            "6C",
            vec![
                ms("Français", 4.0),
                ms("Allemand", 4.0),
                ms("Latin", 4.0),
                ms("Mathématiques", 4.0),
                ms("SciNa", 3.0),
                ms("Histoire", 2.0),
                ms("VieSo", 2.0),
                ms("Géographie", 2.0),
                ms("Artistique", 1.0),
                ms("EduPhys", 1.0),
            ],
        ),
        year(
            "6M",
            vec![
                ms("Français", 4.0),
                ms("Allemand", 4.0),
                ms("Anglais", 4.0),
                ms("Mathématiques", 4.0),
                ms("SciNa", 3.0),
                ms("Histoire", 2.0),
                ms("VieSo", 2.0),
                ms("Géographie", 2.0),
                ms("Artistique", 1.0),
                ms("EduPhys", 1.0),
            ],
        ),
        year(
            "5C",
            vec![
                ms("Français", 4.0),
                ms("Allemand", 4.0),
                ms("Anglais", 4.0),
                ms("Latin", 4.0),
                ms("Mathématiques", 4.0),
                ms("Biologie", 2.0),
                ms("Chimie/Physique", 2.0),
                ms("Histoire", 2.0),
                ms("VieSo", 2.0),
                ms("Géographie", 2.0),
                ms("Artistique", 2.0),
                ms("EduPhys", 1.0),
            ],
        ),
        year(
            "5M",
            vec![
                ms("Français", 4.0),
                ms("Allemand", 4.0),
                ms("Anglais", 4.0),
                ms("Mathématiques", 4.0),
                ms("Biologie", 2.0),
                ms("Chimie/Physique", 2.0),
                ms("Histoire", 2.0),
                ms("VieSo", 2.0),
                ms("Géographie", 2.0),
                ms("Artistique", 2.0),
                ms("EduPhys", 1.0),
            ],
        ),
        year(
            "4C",
            vec![
                ms("Français", 4.0),
                ms("Allemand", 4.0),
                ms("Anglais", 4.0),
                ms("Latin", 4.0),
                ms("Mathématiques", 4.0),
                ms("Biologie", 2.0),
                ms("Chimie/Physique", 2.0),
                ms("Histoire", 2.0),
                ms("VieSo", 2.0),
                ms("Géographie", 2.0),
                ms("Artistique", 2.0),
                ms("EduPhys", 1.0),
            ],
        ),
        year(
            "4M",
            vec![
                ms("Français", 4.0),
                ms("Allemand", 4.0),
                ms("Anglais", 4.0),
                ms("Mathématiques", 4.0),
                ms("Biologie", 2.0),
                ms("Chimie/Physique", 2.0),
                ms("Histoire", 2.0),
                ms("VieSo", 2.0),
                ms("Géographie", 2.0),
                ms("Artistique", 2.0),
                ms("EduPhys", 1.0),
            ],
        ),
        year(
            "3MA",
            vec![
                ms("Français", 4.0),
                ms("Allemand", 4.0),
                ms("Anglais", 4.0),
                ms("4e Langue", 3.0),
                ms("Mathématiques", 2.0),
                ms("Biologie", 2.0),
                ms("Chimie", 2.0),
                ms("Histoire", 2.0),
                ms("VieSo", 2.0),
                ms("Physique", 2.0),
                ms("Artistique", 2.0),
                ms("Option", 2.0),
                ms("EduPhys", 1.0),
            ],
        ),
        year(
            "3CA",
            vec![
                ms("Français", 4.0),
                ms("Allemand", 4.0),
                ms("Anglais", 4.0),
                ms("Latin", 3.0),
                ms("Mathématiques", 2.0),
                ms("Biologie", 2.0),
                ms("Chimie", 2.0),
                ms("Histoire", 2.0),
                ms("VieSo", 2.0),
                ms("Physique", 2.0),
                ms("Artistique", 2.0),
                ms("Option", 2.0),
                ms("EduPhys", 1.0),
            ],
        ),
        year(
            "3MB",
            vec![
                ms("Mathématiques", 4.0),
                ms("Français", 3.0),
                ms("Allemand", 3.0),
                ms("Anglais", 3.0),
                ms("Physique", 3.0),
                ms("Chimie", 3.0),
                ms("Histoire", 2.0),
                ms("Biologie", 2.0),
                ms("Option", 2.0),
                ms("Artistique", 2.0),
                ms("VieSo", 2.0),
                ms("EduPhys", 1.0),
            ],
        ),
        year(
            "3CB",
            vec![
                ms("Mathématiques", 4.0),
                ms("Français", 3.0),
                ms("Allemand", 3.0),
                ms("Anglais", 3.0),
                ms("Physique", 3.0),
                ms("Chimie", 3.0),
                ms("Latin", 3.0),
                ms("Histoire", 2.0),
                ms("Biologie", 2.0),
                ms("Artistique", 2.0),
                ms("VieSo", 2.0),
                ms("EduPhys", 1.0),
            ],
        ),
        year(
            "3MC",
            vec![
                ms("Biologie", 4.0),
                ms("Mathématiques", 3.0),
                ms("Français", 3.0),
                ms("Allemand", 3.0),
                ms("Anglais", 3.0),
                ms("Physique", 3.0),
                ms("Chimie", 3.0),
                ms("Histoire", 2.0),
                ms("Option", 2.0),
                ms("Artistique", 2.0),
                ms("VieSo", 2.0),
                ms("EduPhys", 1.0),
            ],
        ),
        year(
            "3CC",
            vec![
                ms("Biologie", 4.0),
                ms("Mathématiques", 3.0),
                ms("Français", 3.0),
                ms("Allemand", 3.0),
                ms("Anglais", 3.0),
                ms("Physique", 3.0),
                ms("Chimie", 3.0),
                ms("Latin", 3.0),
                ms("Histoire", 2.0),
                ms("Artistique", 2.0),
                ms("VieSo", 2.0),
                ms("EduPhys", 1.0),
            ],
        ),
        year(
            "3MD",
            vec![
                ms("Economie", 4.0),
                ms("Mathématiques", 3.0),
                ms("Français", 3.0),
                ms("Allemand", 3.0),
                ms("Anglais", 3.0),
                ms("Physique", 2.0),
                ms("Chimie", 2.0),
                ms("Biologie", 2.0),
                ms("Histoire", 2.0),
                ms("Option", 2.0),
                ms("Artistique", 2.0),
                ms("VieSo", 2.0),
                ms("EduPhys", 1.0),
            ],
        ),
        year(
            "3CD",
            vec![
                ms("Economie", 4.0),
                ms("Mathématiques", 3.0),
                ms("Français", 3.0),
                ms("Allemand", 3.0),
                ms("Anglais", 3.0),
                ms("Latin", 3.0),
                ms("Physique", 2.0),
                ms("Chimie", 2.0),
                ms("Biologie", 2.0),
                ms("Histoire", 2.0),
                ms("Artistique", 2.0),
                ms("VieSo", 2.0),
                ms("EduPhys", 1.0),
            ],
        ),
        year(
            "3ME",
            vec![
                mc("Artistique", 4.0, art_combi()),
                ms("Français", 3.0),
                ms("Allemand", 3.0),
                ms("Anglais", 3.0),
                ms("Physique", 2.0),
                ms("Chimie", 2.0),
                ms("Histoire", 2.0),
                ms("Option", 2.0),
                ms("Artistique", 2.0),
                ms("VieSo", 2.0),
                ms("EduPhys", 1.0),
            ],
        ),
        year(
            "3CE",
            vec![
                mc("Artistique", 4.0, art_combi()),
                ms("Français", 3.0),
                ms("Allemand", 3.0),
                ms("Anglais", 3.0),
                ms("Latin", 3.0),
                ms("Physique", 2.0),
                ms("Chimie", 2.0),
                ms("Histoire", 2.0),
                ms("Artistique", 2.0),
                ms("VieSo", 2.0),
                ms("EduPhys", 1.0),
            ],
        ),
        year(
            "3MF",
            vec![
                ms("EduMusic", 4.0),
                ms("Mathématiques", 3.0),
                ms("Français", 3.0),
                ms("Allemand", 3.0),
                ms("Anglais", 3.0),
                ms("Physique", 2.0),
                ms("Chimie", 2.0),
                ms("Histoire", 2.0),
                ms("Option", 2.0),
                ms("Artistique", 2.0),
                ms("VieSo", 2.0),
                ms("EduPhys", 1.0),
            ],
        ),
        year(
            "3CF",
            vec![
                ms("EduMusic", 4.0),
                ms("Mathématiques", 3.0),
                ms("Français", 3.0),
                ms("Allemand", 3.0),
                ms("Anglais", 3.0),
                ms("Latin", 3.0),
                ms("Physique", 2.0),
                ms("Chimie", 2.0),
                ms("Histoire", 2.0),
                ms("Artistique", 2.0),
                ms("VieSo", 2.0),
                ms("EduPhys", 1.0),
            ],
        ),
        year(
            "3MG",
            vec![
                ms("Economie", 4.0),
                ms("Mathématiques", 3.0),
                ms("Français", 3.0),
                ms("Allemand", 3.0),
                ms("Anglais", 3.0),
                ms("Physique", 2.0),
                ms("Chimie", 2.0),
                ms("Biologie", 2.0),
                ms("Histoire", 2.0),
                ms("Option", 2.0),
                ms("Artistique", 2.0),
                ms("VieSo", 2.0),
                ms("Géographie", 2.0),
                ms("EduPhys", 1.0),
            ],
        ),
        year(
            "3MG",
            vec![
                ms("Economie", 4.0),
                ms("Mathématiques", 3.0),
                ms("Français", 3.0),
                ms("Allemand", 3.0),
                ms("Anglais", 3.0),
                ms("Latin", 3.0),
                ms("Physique", 2.0),
                ms("Chimie", 2.0),
                ms("Biologie", 2.0),
                ms("Histoire", 2.0),
                ms("Artistique", 2.0),
                ms("VieSo", 2.0),
                ms("Géographie", 2.0),
                ms("EduPhys", 1.0),
            ],
        ),
    ]
}
