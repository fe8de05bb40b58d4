//! The recruitment-process guide: a fixed list of steps, partially shown
//! until the user asks for more.

use std::collections::BTreeSet;

use crate::present::TextPreview;

/// Steps shown before More Steps is pressed.
pub const COLLAPSED_STEP_COUNT: usize = 4;
/// Step text length after which the text is collapsed.
pub const STEP_PREVIEW_CHARS: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStep {
    pub title: &'static str,
    pub content: &'static str,
}

pub const RECRUITMENT_STEPS: [ProcessStep; 9] = [
    ProcessStep {
        title: "Initial Contact",
        content: "The Placement office sends invitations to the companies/organizations along with relevant information.",
    },
    ProcessStep {
        title: "Company Registration",
        content: "Interested companies register on the placement portal and provide necessary details.",
    },
    ProcessStep {
        title: "Pre-Placement Talk",
        content: "Companies conduct pre-placement talks to provide insights about their organization and job roles.",
    },
    ProcessStep {
        title: "Application Process",
        content: "Students apply for the job roles they are interested in through the placement portal.",
    },
    ProcessStep {
        title: "Shortlisting",
        content: "Companies shortlist candidates based on their resumes and academic performance.",
    },
    ProcessStep {
        title: "Aptitude Test",
        content: "Shortlisted candidates appear for an aptitude test conducted by the company.",
    },
    ProcessStep {
        title: "Technical Interview",
        content: "Candidates who clear the aptitude test undergo technical interviews to assess their skills.",
    },
    ProcessStep {
        title: "HR Interview",
        content: "Candidates who clear the technical interview have an HR interview to evaluate their fit for the company culture.",
    },
    ProcessStep {
        title: "Final Selection",
        content: "Selected candidates receive offer letters from the companies.",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepView {
    /// Zero-padded position, `01`..`09`.
    pub number: String,
    pub title: &'static str,
    pub text: TextPreview,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessGuide {
    show_all: bool,
    expanded: BTreeSet<usize>,
}

impl ProcessGuide {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_show_all(&mut self) {
        self.show_all = !self.show_all;
    }

    /// Read More / Read Less on the step at `index` (zero-based).
    pub fn toggle_step(&mut self, index: usize) {
        if index >= RECRUITMENT_STEPS.len() {
            return;
        }
        if !self.expanded.remove(&index) {
            self.expanded.insert(index);
        }
    }

    pub fn toggle_label(&self) -> &'static str {
        if self.show_all {
            "Less Steps"
        } else {
            "More Steps"
        }
    }

    pub fn steps(&self) -> Vec<StepView> {
        let visible = if self.show_all {
            RECRUITMENT_STEPS.len()
        } else {
            COLLAPSED_STEP_COUNT
        };
        RECRUITMENT_STEPS
            .iter()
            .take(visible)
            .enumerate()
            .map(|(index, step)| StepView {
                number: format!("{:02}", index + 1),
                title: step.title,
                text: TextPreview::new(
                    step.content,
                    STEP_PREVIEW_CHARS,
                    self.expanded.contains(&index),
                ),
            })
            .collect()
    }
}
