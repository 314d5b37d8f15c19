// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Reader for SRM (Spatial Rich Model) feature directories.
//!
//! The SRM extractor writes one directory per image, holding one `*.fea` file
//! per sub-model. The first line of each file is the sub-model's feature vector
//! as space-separated numbers followed by a trailing token that is dropped.
//!
//! ```text
//! A_COMMON/
//!   img001/  s1_minmax22h.fea  s1_spam14hv.fea ...
//!   img002/  s1_minmax22h.fea  s1_spam14hv.fea ...
//! ```
//!
//! Images are visited in sorted name order so that the A, B and C sets built
//! from the same cover images line up row by row.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::error::{FeatureError, Result};
use super::{matrix_from_rows, FeatureMatrix};

/// Features of one SRM directory, split by sub-model.
#[derive(Debug, Clone)]
pub struct SrmSet {
    submodels: BTreeMap<String, FeatureMatrix>,
    names: Vec<String>,
}

impl SrmSet {
    /// Image names, one per row of every sub-model matrix.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn submodel(&self, name: &str) -> Option<&FeatureMatrix> {
        self.submodels.get(name)
    }

    pub fn submodel_names(&self) -> impl Iterator<Item = &str> {
        self.submodels.keys().map(String::as_str)
    }

    /// All sub-models side by side, in sorted sub-model order.
    pub fn concatenated(&self) -> FeatureMatrix {
        let total: usize = self.submodels.values().map(|m| m.ncols()).sum();
        let mut out = FeatureMatrix::zeros(self.names.len(), total);
        let mut offset = 0;
        for m in self.submodels.values() {
            for i in 0..m.nrows() {
                for j in 0..m.ncols() {
                    out[(i, offset + j)] = m[(i, j)];
                }
            }
            offset += m.ncols();
        }
        out
    }
}

/// The three ATS feature sets, each fully concatenated.
#[derive(Debug, Clone)]
pub struct AbcFeatures {
    pub a: FeatureMatrix,
    pub b: FeatureMatrix,
    pub c: FeatureMatrix,
    /// Image names of the B set (the set being classified).
    pub names: Vec<String>,
}

/// Parse the first line of a `.fea` file, dropping the trailing token and
/// skipping fields that are not numbers.
pub fn parse_fea_line(text: &str) -> Vec<f64> {
    let first = text.lines().next().unwrap_or("");
    let mut fields: Vec<&str> = first.split(' ').collect();
    fields.pop();
    fields
        .into_iter()
        .filter_map(|f| f.trim().parse::<f64>().ok())
        .collect()
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = std::fs::read_dir(dir)
        .map_err(|e| FeatureError::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| FeatureError::io(dir, e))?;
    entries.sort();
    Ok(entries)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read every image directory below `dir`.
///
/// # Errors
/// [`FeatureError::Srm`] when images disagree on the set of sub-models or on
/// a sub-model's length, [`FeatureError::Empty`] when no image has features.
pub fn read_srm(dir: impl AsRef<Path>) -> Result<SrmSet> {
    let dir = dir.as_ref();
    let mut rows: BTreeMap<String, Vec<Vec<f64>>> = BTreeMap::new();
    let mut names = Vec::new();

    for image_dir in sorted_entries(dir)?.into_iter().filter(|p| p.is_dir()) {
        let mut features = BTreeMap::new();
        for fea in sorted_entries(&image_dir)?
            .into_iter()
            .filter(|p| p.extension().is_some_and(|e| e == "fea"))
        {
            let text = std::fs::read_to_string(&fea).map_err(|e| FeatureError::io(&fea, e))?;
            features.insert(file_stem(&fea), parse_fea_line(&text));
        }
        if features.is_empty() {
            log::warn!("no .fea files in {}, skipping", image_dir.display());
            continue;
        }

        if !names.is_empty() && !features.keys().eq(rows.keys()) {
            return Err(FeatureError::Srm {
                path: image_dir,
                message: "sub-model set differs from previous images".into(),
            });
        }
        for (submodel, vector) in features {
            let entry = rows.entry(submodel.clone()).or_default();
            if let Some(first) = entry.first() {
                if first.len() != vector.len() {
                    return Err(FeatureError::Srm {
                        path: image_dir,
                        message: format!(
                            "sub-model {submodel} has {} values, expected {}",
                            vector.len(),
                            first.len()
                        ),
                    });
                }
            }
            entry.push(vector);
        }
        names.push(file_stem(&image_dir));
    }

    if names.is_empty() {
        return Err(FeatureError::Empty);
    }
    log::debug!(
        "read {} images x {} sub-models from {}",
        names.len(),
        rows.len(),
        dir.display()
    );
    let submodels = rows
        .into_iter()
        .map(|(name, r)| (name, matrix_from_rows(&r)))
        .collect();
    Ok(SrmSet { submodels, names })
}

/// Read the A, B and C directories and concatenate their sub-models.
///
/// # Errors
/// [`FeatureError::Srm`] if the three sets do not share the same sub-models.
pub fn read_srm_abc(
    a: impl AsRef<Path>,
    b: impl AsRef<Path>,
    c: impl AsRef<Path>,
) -> Result<AbcFeatures> {
    let set_a = read_srm(a.as_ref())?;
    let set_b = read_srm(b.as_ref())?;
    let set_c = read_srm(c.as_ref())?;
    for (set, path) in [(&set_b, b.as_ref()), (&set_c, c.as_ref())] {
        if !set.submodel_names().eq(set_a.submodel_names()) {
            return Err(FeatureError::Srm {
                path: path.to_path_buf(),
                message: "sub-model set differs from the A set".into(),
            });
        }
    }
    Ok(AbcFeatures {
        a: set_a.concatenated(),
        b: set_b.concatenated(),
        c: set_c.concatenated(),
        names: set_b.names,
    })
}
