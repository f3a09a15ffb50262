//! Prompt construction for the vision backends.
//!
//! The audit rules and the approval field mapping live here as text because
//! they are contract, not code: the model is the component that applies
//! them. Field names inside the approval mapping are upstream protocol
//! constants and must stay verbatim.


use crate::audit::Claim;

/// The per-image question for the offline extraction flow. The local model
/// cannot answer with a reliable structured verdict, so it is only asked to
/// read.
pub const EXTRACTION_QUESTION: &str = "Read all text visible on this product label. \
     List: 1) All numbers you see (especially barcodes) 2) Product name and description. \
     Be specific and accurate.";

/// Builds the audit instructions sent to the remote provider alongside the
/// images.
pub fn audit_instructions(claim: &Claim, image_count: usize) -> String {
    let claim_json = serde_json::json!({
        "id": claim.id,
        "description": claim.description,
        "barcodes": claim.barcodes,
    });

    format!(
        "Act as a rigorous but intelligent product auditor. Compare this product claim \
         JSON: {claim_json} against the {image_count} attached product image(s).\n\n\
         Rules:\n\
         1. The barcode printed on the packaging must be EXACTLY identical to the claimed \
         barcode, digit for digit.\n\
         2. For the description, ignore capitalization, spacing and accents; what matters \
         is that the semantic content is the same ('Xequemate' = 'XEQUE MATE' = \
         'xeque mate'). REJECT if it is a genuinely different product ('Coca Cola' vs \
         'Pepsi').\n\
         3. If the images are illegible, blurred, or the barcode is not visible, REJECT.\n\
         4. If you have ANY doubt about the product identity, REJECT.\n\n\
         Respond ONLY with a JSON object in exactly this format:\n\
         {{\"status\": \"APPROVED\" or \"REJECTED\", \"motivo\": \"detailed explanatory text\"}}"
    )
}

/// Builds the text-only prompt that asks the provider to transform an
/// approved submission into the catalog system's approval document.
pub fn approval_instructions(submission_json: &str) -> String {
    format!(
        "You are an assistant specialized in convenience-product catalog registration.\n\n\
         Based on the submission JSON below, assemble the product approval JSON in the \
         exact format specified.\n\n\
         GENERAL RULE: when an output field has the same name as a field of the input \
         JSON (at any level), copy the value directly. Apply the specific rules only \
         where the field has a different name or needs a transformation.\n\n\
         INPUT JSON:\n{submission_json}\n\n\
         FIELD MAPPING (only fields needing a transformation or a specific source):\n\
         - IdSolicitacao: copy from IdSolicitacao (root)\n\
         - DescricaoProduto: copy from Precadastro.DescricaoProduto\n\
         - Gift: copy from Precadastro.Gift; if null use '0'\n\
         - Notabilidade: copy from Precadastro.Notabilidade; if null use 'Não Notável'\n\
         - MarkUp: copy from Precadastro.MarkUp; if null use 0\n\
         - IdEstruturaMercadologica: copy from Precadastro.IdEstruturaMercadologica (may be null)\n\
         - IdNivel1EstrMerc: copy from Precadastro.IdNivel1EstrMerc\n\
         - IdNivel2EstrMerc: copy from Precadastro.IdNivel2EstrMerc\n\
         - IdNivel3EstrMerc: copy from Precadastro.IdNivel3EstrMerc (may be null)\n\
         - IdNivel4EstrMerc: null (not present in the input JSON)\n\
         - IdSolucaoOptativa: copy from Precadastro.IdSolucaoOptativa; if null use 0\n\
         - IdMarca: copy from Precadastro.IdMarca\n\
         - ConteudoEmbalagem: copy from Precadastro.QuantidadeConteudoEmbalagem\n\
         - IdUnidadeMedida: copy from Precadastro.IdUnidadeMedidaEmbalagem\n\
         - Segmentos: copy from Segmentos (root)\n\
         - StatusSolicitacao: copy from StatusSolicitacao (root)\n\
         - Observacao: copy from Observacao (root)\n\
         - Usuario: copy from EnviadoPor (root)\n\
         - TipoProduto: copy from Precadastro.TipoItemMix converted to a number; if '?' or null use 0\n\
         - Producao: '0' if not available\n\
         - codigosDeBarras: build an array from listEmbalagemSolicitacao with this mapping:\n\
             idEmbalagemSolicitacao <- IdEmbalagemSolicitacao\n\
             IdSolicitacao          <- IdSolicitacao (root)\n\
             quantidadeEmbalagem    <- QuantidadeEmbalagem\n\
             idUnidadeMedida        <- IdUnidadeMedida\n\
             tipoCodigoBarras       <- TipoCodigoBarras\n\
             codigoBarras           <- CodigoBarras\n\
             Principal              <- false\n\
         - Anexo: copy NomeArquivo from the first item of Anexos; '' if empty\n\
         - ReferenciaFabricante: '' if not available\n\
         - ForaMix: '0' if not available\n\
         - PitStop: copy from Revendedor.PitStop\n\
         - Regional: '0' if not available\n\
         - DiretorioAnexo: copy from DiretorioAnexo (root)\n\
         - DescricaoCupom: copy from Precadastro.DescricaoProduto\n\
         - IdRevendedor: copy from IdRevendedor (root)\n\
         - DataAprovacao: null\n\
         - AprovadoPor: null\n\
         - IdProduto: null\n\
         - idProduto: null\n\n\
         Return ONLY the output JSON, with no explanations and no markdown."
    )
}
