// ============================================================================
// Templates HTML (Tera)
// ============================================================================
// Les templates sont embarqués dans le binaire avec include_str! : le
// serveur démarre sans dépendre du répertoire courant.
// ============================================================================

use tera::{Context, Tera};

pub const INDEX: &str = "index.html";
pub const COMPARISON_FORM: &str = "comparison_form.html";

/// Moteur de templates partagé par les routes
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Compile les templates embarqués
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (INDEX, include_str!("../../templates/index.html")),
            (
                COMPARISON_FORM,
                include_str!("../../templates/comparison_form.html"),
            ),
        ])?;
        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<String, tera::Error> {
        self.tera.render(name, context)
    }
}
