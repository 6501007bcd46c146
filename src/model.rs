/// Dimensions are in PDF points (1/72 in).
pub struct Page {
    pub width: f32,
    pub height: f32,
    pub paragraphs: Vec<Paragraph>,
}

pub struct Paragraph {
    pub text: String,
}

/// Consecutive pages sharing the same page geometry.
pub struct Section {
    pub width: f32,
    pub height: f32,
    pub pages: Vec<Page>,
}

pub struct Document {
    pub title: String,
    pub sections: Vec<Section>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.sections.iter().map(|s| s.pages.len()).sum()
    }
}

pub(crate) fn pts_to_twips(pts: f32) -> u32 {
    (pts * 20.0).round().max(0.0) as u32
}

/// Groups pages into sections, starting a new one whenever the page size
/// changes (compared at twip resolution).
pub fn group_sections(pages: Vec<Page>) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    for page in pages {
        let same_size = sections.last().is_some_and(|s| {
            pts_to_twips(s.width) == pts_to_twips(page.width)
                && pts_to_twips(s.height) == pts_to_twips(page.height)
        });
        match sections.last_mut() {
            Some(section) if same_size => section.pages.push(page),
            _ => sections.push(Section {
                width: page.width,
                height: page.height,
                pages: vec![page],
            }),
        }
    }
    sections
}
