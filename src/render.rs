use std::io;

use rand::{ rngs::StdRng, seq::SliceRandom };

use crate::{ math::Vec2, surface::GridSurface, transform::GridTransform };

/// Everything a draw call needs. `wall` is real elapsed seconds, so flicker and spin run
/// at the same speed whatever the frame rate or time warp.
pub struct DrawContext<'a> {
    pub surface: &'a mut dyn GridSurface,
    pub transform: GridTransform,
    pub wall: f64,
    pub rng: &'a mut StdRng,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Renderable {
    Glyph(String),
    /// A random pick from the set on every draw
    Flicker(Vec<char>),
    /// Cycles through the glyphs, `rate` glyphs per second
    Spin { glyphs: Vec<char>, rate: f64 },
    /// Children drawn relative to a shared anchor; later children overdraw earlier ones
    Composite(Vec<(Vec2, Renderable)>),
}

pub enum Resolved<'a> {
    Text(String),
    Tree(&'a [(Vec2, Renderable)]),
}

impl From<&str> for Renderable {
    fn from(text: &str) -> Self {
        Renderable::Glyph(text.to_string())
    }
}

impl Renderable {
    pub fn flicker(glyphs: &str) -> Self {
        Renderable::Flicker(glyphs.chars().collect())
    }

    pub fn spin(glyphs: &str, rate: f64) -> Self {
        Renderable::Spin { glyphs: glyphs.chars().collect(), rate }
    }

    pub fn composite<I: IntoIterator<Item = ((f64, f64), Renderable)>>(children: I) -> Self {
        Renderable::Composite(children.into_iter().map(|(off, r)| (off.into(), r)).collect())
    }

    pub fn resolve(&self, wall: f64, rng: &mut StdRng) -> Resolved<'_> {
        match self {
            Renderable::Glyph(text) => Resolved::Text(text.clone()),
            Renderable::Flicker(glyphs) => {
                Resolved::Text(glyphs.choose(rng).map(|c| c.to_string()).unwrap_or_default())
            }
            Renderable::Spin { glyphs, rate } => {
                if glyphs.is_empty() {
                    return Resolved::Text(String::new())
                }
                let index = (wall * rate).floor().max(0.0) as usize % glyphs.len();
                Resolved::Text(glyphs[index].to_string())
            }
            Renderable::Composite(children) => Resolved::Tree(children),
        }
    }

    pub fn draw(&self, ctx: &mut DrawContext, pos: Vec2, off: Option<Vec2>, clear_to_eol: bool) -> io::Result<()> {
        let pos = GridTransform::to_grid(pos, off);
        match self.resolve(ctx.wall, ctx.rng) {
            Resolved::Text(text) => put_text(ctx, pos, &text, clear_to_eol),
            Resolved::Tree(children) => draw_children(ctx, pos, children, clear_to_eol),
        }
    }

    /// Draws only the first `stages` children of a composite. Leaves draw whole.
    pub fn draw_stages(&self, ctx: &mut DrawContext, pos: Vec2, stages: usize) -> io::Result<()> {
        match self {
            Renderable::Composite(children) => {
                let stages = stages.min(children.len());
                draw_children(ctx, pos, &children[..stages], false)
            }
            _ => self.draw(ctx, pos, None, false),
        }
    }

    pub fn stage_count(&self) -> usize {
        match self {
            Renderable::Composite(children) => children.len(),
            _ => 1,
        }
    }
}

fn draw_children(ctx: &mut DrawContext, anchor: Vec2, children: &[(Vec2, Renderable)], clear_to_eol: bool) -> io::Result<()> {
    for (off, child) in children {
        child.draw(ctx, anchor, Some(*off), clear_to_eol)?;
    }
    Ok(())
}

fn put_text(ctx: &mut DrawContext, pos: Vec2, text: &str, clear_to_eol: bool) -> io::Result<()> {
    let cell = match ctx.transform.try_clip(ctx.surface.size(), pos) {
        Some(cell) => cell,
        None => return Ok(()), // off screen, nothing to draw
    };
    if clear_to_eol {
        ctx.surface.clear_to_eol(cell.row, cell.col)?;
    }
    ctx.surface.put_glyphs(cell.row, cell.col, text)
}

/// HUD text in simulation coordinates; row 0 is the bottom line
pub fn message(ctx: &mut DrawContext, text: &str, row: f64, col: f64, clear_to_eol: bool) -> io::Result<()> {
    put_text(ctx, Vec2::new(col, row), text, clear_to_eol)
}

/// Nose cone, then progressively bigger exhaust plumes. Stage `n` overdraws the
/// ones before it, so drawing a prefix of the stages scales the flame with thrust.
pub fn rocket_sprite() -> Renderable {
    use self::Renderable as R;
    let f = R::flicker;
    let sub = |children: Vec<((f64, f64), Renderable)>| R::composite(children);

    R::composite(vec![
        ((0.0, 1.0), R::from("^")),
        ((0.0, 0.0), f("|!")),
        ((0.0, -1.0), sub(vec![
            ((0.0, 0.0), f("'`")),
        ])),
        ((0.0, -1.0), sub(vec![
            ((0.0, 0.0), f(";'`^!.,")),
        ])),
        ((0.0, -1.0), sub(vec![
            ((0.0, 0.0), f("xo")),
            ((0.0, -1.0), f(";'`^!.,")),
        ])),
        ((0.0, -1.0), sub(vec![
            ((0.0, 0.0), f("XxOo")),
            ((0.0, -1.0), f("xo")),
            ((0.0, -2.0), f(";'`^!.,")),
        ])),
        ((0.0, -1.0), sub(vec![
            ((-0.5, 0.0), f("( ")),
            ((0.0, 0.0), f("XO")),
            ((0.5, 0.0), f(" )")),
            ((0.0, -1.0), f("xo")),
            ((0.0, -2.0), f(";'`^!.,")),
        ])),
        ((0.0, -1.0), sub(vec![
            ((-0.5, 0.0), f("(")),
            ((0.0, 0.0), f("XO")),
            ((0.5, 0.0), f(")")),
            ((0.0, -1.0), f("xo")),
            ((0.0, -2.0), f("xo")),
            ((0.0, -3.0), f(";'`^!.,")),
        ])),
        ((0.0, -1.0), sub(vec![
            ((-0.5, 0.0), f("(")),
            ((0.0, 0.0), f("XO")),
            ((0.5, 0.0), f(")")),
            ((0.0, -1.0), f("xo")),
            ((0.0, -2.0), f("xo")),
            ((0.0, -3.0), f("xo")),
            ((0.0, -4.0), f(";'`^!.,")),
        ])),
    ])
}
