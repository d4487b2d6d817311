// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Class lookup table
//!
//! Maps the model's output index to a class name, a description of the
//! condition and a prevention recommendation. Order must match the order
//! of the model's output units.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ClassifierError;

/// One class of the classifier output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassLabel {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prevention: String,
}

impl ClassLabel {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        prevention: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            prevention: prevention.into(),
        }
    }
}

/// Ordered, non-empty list of class labels
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTable {
    classes: Vec<ClassLabel>,
}

const HEALTHY_DESCRIPTION: &str = "Tanaman cabai sehat menunjukkan pertumbuhan yang normal dengan daun hijau segar tanpa tanda-tanda kerusakan atau infeksi penyakit. Batang dan buah juga tampak sehat tanpa gejala abnormal";
const LEAF_CURL_DESCRIPTION: &str = "Penyakit ini menyebabkan daun tanaman cabai mengeriting dan menggulung. Biasanya disebabkan oleh virus, kutu daun, atau hama lainnya yang menghisap cairan dari daun.";
const LEAF_SPOT_DESCRIPTION: &str = "Penyakit ini ditandai dengan munculnya bercak-bercak coklat atau hitam pada daun. Penyebab utamanya adalah infeksi jamur atau bakteri";
const WHITEFLY_DESCRIPTION: &str = "Hama lalat putih menghisap cairan tanaman dan menyebabkan daun menjadi kuning, layu, dan rontok. Mereka juga dapat menyebarkan berbagai penyakit tanaman";
const YELLOWISH_DESCRIPTION: &str = "Tanaman cabai yang mengalami kekuningan biasanya menunjukkan gejala daun yang menguning akibat defisiensi nutrisi, overwatering, atau serangan hama/penyakit";

const HEALTHY_PREVENTION: &str = "Menjaga kesehatan tanaman cabai memerlukan pendekatan holistik. Penting untuk menjaga kebersihan lingkungan tanam dan memastikan tanaman mendapat cukup nutrisi serta air. Rotasi tanaman juga sangat disarankan untuk mencegah penumpukan patogen di tanah. Pemantauan rutin perlu dilakukan untuk mendeteksi dini adanya tanda-tanda penyakit sehingga tindakan cepat bisa diambil.";
const LEAF_CURL_PREVENTION: &str = "Pengendalian keriting daun bisa dimulai dengan mengontrol populasi kutu daun menggunakan insektisida atau predator alami seperti ladybugs. Penting juga untuk menjaga kebersihan alat-alat pertanian guna mencegah penyebaran virus. Menanam varietas cabai yang tahan terhadap penyakit keriting daun sangat dianjurkan. Selain itu, tanaman yang sudah terinfeksi harus segera dihilangkan dan dibakar untuk mencegah penyebaran lebih lanjut.";
const LEAF_SPOT_PREVENTION: &str = "Pencegahan bercak daun bisa dilakukan dengan menjaga kelembaban lingkungan tanam agar tidak terlalu tinggi. Penggunaan fungisida atau bakterisida yang tepat sesuai dengan penyebab infeksi sangat penting. Daun yang terinfeksi harus segera dibuang dan dibakar untuk mencegah penyebaran. Menghindari penyiraman dari atas juga dapat mengurangi penyebaran spora jamur atau bakteri yang menjadi penyebab utama penyakit ini.";
const WHITEFLY_PREVENTION: &str = "Untuk mengatasi lalat putih, gunakan perangkap lengket berwarna kuning yang efektif dalam mengurangi populasi lalat putih. Penyemprotan tanaman dengan insektisida berbasis minyak neem atau sabun insektisida juga dianjurkan. Menjaga kebersihan lingkungan sekitar tanaman membantu mengurangi tempat bertelur lalat putih. Selain itu, memperkenalkan predator alami seperti lacewing atau ladybugs dapat menjadi solusi biologis yang efektif.";
const YELLOWISH_PREVENTION: &str = "Memastikan tanaman mendapatkan nutrisi yang cukup, terutama nitrogen, magnesium, dan zat besi sangat penting untuk mencegah daun kekuningan. Penyiraman harus diatur agar tidak berlebihan, dengan menjaga kelembaban tanah yang optimal. Mengontrol populasi hama seperti kutu daun dan tungau juga krusial untuk mencegah kekuningan. Melakukan pemupukan secara teratur dengan pupuk yang seimbang akan membantu tanaman tetap sehat dan hijau.";

impl LabelTable {
    /// Build a table, rejecting empty tables, blank names and duplicates
    pub fn new(classes: Vec<ClassLabel>) -> Result<Self, ClassifierError> {
        if classes.is_empty() {
            return Err(ClassifierError::InvalidLabels(
                "label table must contain at least one class".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for (index, class) in classes.iter().enumerate() {
            if class.name.trim().is_empty() {
                return Err(ClassifierError::InvalidLabels(format!(
                    "class {} has an empty name",
                    index
                )));
            }
            if !seen.insert(class.name.as_str()) {
                return Err(ClassifierError::InvalidLabels(format!(
                    "duplicate class name '{}'",
                    class.name
                )));
            }
        }

        Ok(Self { classes })
    }

    /// The five chili leaf classes the bundled model was trained on
    pub fn chili_leaf() -> Self {
        Self {
            classes: vec![
                ClassLabel::new("Healthy", HEALTHY_DESCRIPTION, HEALTHY_PREVENTION),
                ClassLabel::new("Leaf Curl", LEAF_CURL_DESCRIPTION, LEAF_CURL_PREVENTION),
                ClassLabel::new("Leaf Spot", LEAF_SPOT_DESCRIPTION, LEAF_SPOT_PREVENTION),
                ClassLabel::new("Whitefly", WHITEFLY_DESCRIPTION, WHITEFLY_PREVENTION),
                ClassLabel::new("Yellowish", YELLOWISH_DESCRIPTION, YELLOWISH_PREVENTION),
            ],
        }
    }

    /// Load a table from a JSON array of `{"name", "description", "prevention"}`
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ClassifierError::LabelsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let classes: Vec<ClassLabel> = serde_json::from_str(&raw)?;
        Self::new(classes)
    }

    pub fn get(&self, index: usize) -> Option<&ClassLabel> {
        self.classes.get(index)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.classes.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassLabel> {
        self.classes.iter()
    }
}

impl Default for LabelTable {
    fn default() -> Self {
        Self::chili_leaf()
    }
}
