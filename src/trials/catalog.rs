use crate::pattern::{ops, primitives, Pattern};

/// A named target shape with the hint shown in tutorial mode.
#[derive(Debug, Clone, Copy)]
pub struct TargetDefinition {
    pub name: &'static str,
    pub hint: &'static str,
    pub generate: fn() -> Pattern,
}

/// Ordered, indexable list of trial targets.
#[derive(Debug, Clone)]
pub struct TargetCatalog {
    targets: Vec<TargetDefinition>,
}

impl TargetCatalog {
    pub fn new(targets: Vec<TargetDefinition>) -> Self {
        Self { targets }
    }

    /// The shapes used by the standard task, easiest first.
    pub fn builtin() -> Self {
        Self::new(vec![
            TargetDefinition {
                name: "horizontal_line",
                hint: "Add a horizontal line to the blank canvas.",
                generate: || primitives::line_horizontal(5),
            },
            TargetDefinition {
                name: "frame",
                hint: "The square border primitive already matches this shape.",
                generate: primitives::square_border,
            },
            TargetDefinition {
                name: "cross",
                hint: "Build a horizontal line, then add a vertical line to it.",
                generate: || ops::add(&primitives::line_horizontal(5), &primitives::line_vertical(5)),
            },
            TargetDefinition {
                name: "inverted_diagonal",
                hint: "Build the diagonal, then invert it.",
                generate: || ops::invert(&primitives::diagonal()),
            },
            TargetDefinition {
                name: "upper_triangle",
                hint: "Reflect the triangle across the diagonal.",
                generate: || ops::reflect_diag(&primitives::triangle()),
            },
            TargetDefinition {
                name: "x_shape",
                hint: "Add the diagonal to its mirror image.",
                generate: || ops::add(&primitives::diagonal(), &ops::reflect_vertical(&primitives::diagonal())),
            },
            TargetDefinition {
                name: "framed_cross",
                hint: "Combine a cross with the square border.",
                generate: || {
                    let cross = ops::add(&primitives::line_horizontal(5), &primitives::line_vertical(5));
                    ops::add(&primitives::square_border(), &cross)
                },
            },
            TargetDefinition {
                name: "notched_frame",
                hint: "Subtract a cross from the square border.",
                generate: || {
                    let cross = ops::add(&primitives::line_horizontal(5), &primitives::line_vertical(5));
                    ops::subtract(&primitives::square_border(), &cross)
                },
            },
            TargetDefinition {
                name: "pyramid",
                hint: "Union keeps only the cells two shapes share: try a triangle and its mirror.",
                generate: || ops::union(&primitives::triangle(), &ops::reflect_vertical(&primitives::triangle())),
            },
            TargetDefinition {
                name: "hollow_triangle",
                hint: "Cut the interior out of the triangle so only its outline remains.",
                generate: || {
                    let shifted = ops::subtract(&primitives::triangle(), &primitives::diagonal());
                    let inner = ops::subtract(&shifted, &primitives::line_vertical(0));
                    let inner = ops::subtract(&inner, &primitives::line_horizontal(9));
                    ops::subtract(&primitives::triangle(), &inner)
                },
            },
        ])
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TargetDefinition> {
        self.targets.get(index)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.targets.iter().position(|target| target.name == name)
    }
}
