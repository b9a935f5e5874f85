#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slide {
    pub title: &'static str,
    pub subtitle: &'static str,
}

pub const SLIDES: [Slide; 3] = [
    Slide {
        title: "Intelligent Research Paper Management",
        subtitle: "Discover, organize, and analyze academic research with AI-powered insights",
    },
    Slide {
        title: "AI-Powered Research Assistant",
        subtitle: "Get instant answers and insights from your research papers using advanced AI",
    },
    Slide {
        title: "Organize Your Research Efficiently",
        subtitle: "Create workspaces, import papers, and keep your research perfectly organized",
    },
];

/// 首页轮播，纯展示
#[derive(Debug, Default)]
pub struct Carousel {
    current: usize,
}

impl Carousel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn slide(&self) -> &'static Slide {
        &SLIDES[self.current]
    }

    /// 到末尾后回到第一张
    pub fn advance(&mut self) -> &'static Slide {
        self.current = (self.current + 1) % SLIDES.len();
        self.slide()
    }

    pub fn go_to(&mut self, index: usize) -> bool {
        if index < SLIDES.len() {
            self.current = index;
            true
        } else {
            false
        }
    }
}
